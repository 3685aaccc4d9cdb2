//! Application value model.
//!
//! `Value` is the in-memory value graph the converter works on. It covers
//! both sides of a conversion: arbitrary application values (functions,
//! class instances, nested arrays, symbols) and the restricted subset the
//! document store accepts.

use crate::native::{DocumentReference, FieldValue, GeoPoint, Timestamp};
use crate::types::{TypeTag, ValueKind};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;

/// Insertion-ordered mapping from field name to value.
pub type Map = IndexMap<String, Value>;

/// Application value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value. As a conversion result it means "omit this field".
    Undefined,

    /// Null value
    Null,

    /// Boolean value
    Bool(bool),

    /// Integral number
    Int(i64),

    /// Floating point number
    Float(f64),

    /// Large integer
    BigInt(i128),

    /// UTF-8 string
    String(String),

    /// Symbol, carrying its description
    Symbol(String),

    /// Function with its name and source text
    Function(FunctionValue),

    /// Array of values
    Array(Vec<Value>),

    /// Plain record
    Object(Map),

    /// Instance of a named class
    Instance(Instance),

    /// Platform date/time
    Date(DateTime<Utc>),

    /// Document reference
    Reference(DocumentReference),

    /// Geographic point
    GeoPoint(GeoPoint),

    /// Store timestamp
    Timestamp(Timestamp),

    /// Server-side value placeholder
    FieldValue(FieldValue),

    /// Host value the model has no variant for
    Opaque(Opaque),
}

/// Function value.
///
/// Functions are data here: a name and the textual source. Turning source
/// back into executable code is left to an explicitly installed hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionValue {
    /// Function name, empty for anonymous functions
    pub name: String,
    /// Source text
    pub source: String,
}

impl FunctionValue {
    /// Create a new function value.
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }
}

/// Instance of a named class with its own enumerable fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    /// Class (constructor) name
    pub class_name: String,
    /// Own fields, in declaration order
    pub fields: Map,
}

impl Instance {
    /// Create an instance with no fields.
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            fields: Map::new(),
        }
    }

    /// Add a field.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Get a field by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

/// Unrecognized host value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opaque {
    /// Host type name
    pub type_name: String,
    /// Textual representation
    pub repr: String,
}

impl Opaque {
    /// Create a new opaque value.
    pub fn new(type_name: impl Into<String>, repr: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            repr: repr.into(),
        }
    }
}

impl Value {
    /// Build a plain object from `(name, value)` pairs.
    pub fn object<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Object(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build an array from values.
    pub fn array<I, V>(elements: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::Array(elements.into_iter().map(Into::into).collect())
    }

    /// Runtime type tag.
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::Undefined => TypeTag::Undefined,
            Value::Null => TypeTag::Null,
            Value::Bool(_) => TypeTag::Boolean,
            Value::Int(_) | Value::Float(_) => TypeTag::Number,
            Value::BigInt(_) => TypeTag::BigInt,
            Value::String(_) => TypeTag::String,
            Value::Symbol(_) => TypeTag::Symbol,
            Value::Function(_) => TypeTag::Function,
            Value::Array(_)
            | Value::Object(_)
            | Value::Instance(_)
            | Value::Date(_)
            | Value::Reference(_)
            | Value::GeoPoint(_)
            | Value::Timestamp(_)
            | Value::FieldValue(_)
            | Value::Opaque(_) => TypeTag::Object,
        }
    }

    /// Dispatch category.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Undefined => ValueKind::Undefined,
            Value::Null => ValueKind::Null,
            Value::Bool(_)
            | Value::Int(_)
            | Value::Float(_)
            | Value::BigInt(_)
            | Value::String(_) => ValueKind::Scalar,
            Value::Symbol(_) => ValueKind::Symbol,
            Value::Date(_)
            | Value::Reference(_)
            | Value::GeoPoint(_)
            | Value::Timestamp(_)
            | Value::FieldValue(_) => ValueKind::StoreNative,
            Value::Function(_) => ValueKind::Function,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::PlainObject,
            Value::Instance(_) => ValueKind::Instance,
            Value::Opaque(_) => ValueKind::Unknown,
        }
    }

    /// Name of the value's constructor.
    ///
    /// `None` for undefined and null, which have no constructor.
    pub fn constructor_name(&self) -> Option<&str> {
        match self {
            Value::Undefined | Value::Null => None,
            Value::Bool(_) => Some("Boolean"),
            Value::Int(_) | Value::Float(_) => Some("Number"),
            Value::BigInt(_) => Some("BigInt"),
            Value::String(_) => Some("String"),
            Value::Symbol(_) => Some("Symbol"),
            Value::Function(_) => Some("Function"),
            Value::Array(_) => Some("Array"),
            Value::Object(_) => Some("Object"),
            Value::Instance(instance) => Some(&instance.class_name),
            Value::Date(_) => Some("Date"),
            Value::Reference(_) => Some("DocumentReference"),
            Value::GeoPoint(_) => Some("GeoPoint"),
            Value::Timestamp(_) => Some("Timestamp"),
            Value::FieldValue(_) => Some("FieldValue"),
            Value::Opaque(opaque) => Some(&opaque.type_name),
        }
    }

    /// Check if this value is undefined.
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Try to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get this value as an i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::BigInt(i) => i64::try_from(*i).ok(),
            _ => None,
        }
    }

    /// Try to get this value as an f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as an array.
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Try to get this value as a plain object.
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Try to get this value as a class instance.
    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Value::Instance(instance) => Some(instance),
            _ => None,
        }
    }

    /// Look up a field of a plain object or instance.
    pub fn get(&self, field: &str) -> Option<&Value> {
        match self {
            Value::Object(map) => map.get(field),
            Value::Instance(instance) => instance.get(field),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i128> for Value {
    fn from(i: i128) -> Self {
        Value::BigInt(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(elements: Vec<Value>) -> Self {
        Value::Array(elements)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Object(map)
    }
}

impl From<Instance> for Value {
    fn from(instance: Instance) -> Self {
        Value::Instance(instance)
    }
}

impl From<FunctionValue> for Value {
    fn from(function: FunctionValue) -> Self {
        Value::Function(function)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Value::Date(dt)
    }
}

impl From<DocumentReference> for Value {
    fn from(r: DocumentReference) -> Self {
        Value::Reference(r)
    }
}

impl From<GeoPoint> for Value {
    fn from(p: GeoPoint) -> Self {
        Value::GeoPoint(p)
    }
}

impl From<Timestamp> for Value {
    fn from(ts: Timestamp) -> Self {
        Value::Timestamp(ts)
    }
}

impl From<FieldValue> for Value {
    fn from(fv: FieldValue) -> Self {
        Value::FieldValue(fv)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}
