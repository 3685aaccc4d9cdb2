//! Type inspection for application values.
//!
//! Every [`Value`](crate::Value) is classified twice before it is converted:
//!
//! - [`TypeTag`] - the coarse runtime type tag custom converters are keyed by
//! - [`ValueKind`] - the dispatch category the built-in conversion cases match on
//!
//! Both are closed enums, so the conversion code dispatches with exhaustive
//! `match` expressions instead of comparing class-name strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Runtime type tag of a value.
///
/// Arrays, plain objects, class instances, dates and store-native values all
/// share the [`TypeTag::Object`] tag; use the constructor name to tell them
/// apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    /// Absent value
    Undefined,
    /// Explicit null
    Null,
    /// Boolean scalar
    Boolean,
    /// Integral or floating point number
    Number,
    /// Large integer
    BigInt,
    /// UTF-8 string
    String,
    /// Symbol with a description
    Symbol,
    /// Function value
    Function,
    /// Any object-like value
    Object,
}

impl TypeTag {
    /// All tags, in declaration order.
    pub const ALL: [TypeTag; 9] = [
        TypeTag::Undefined,
        TypeTag::Null,
        TypeTag::Boolean,
        TypeTag::Number,
        TypeTag::BigInt,
        TypeTag::String,
        TypeTag::Symbol,
        TypeTag::Function,
        TypeTag::Object,
    ];

    /// Lowercase name of the tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTag::Undefined => "undefined",
            TypeTag::Null => "null",
            TypeTag::Boolean => "boolean",
            TypeTag::Number => "number",
            TypeTag::BigInt => "bigint",
            TypeTag::String => "string",
            TypeTag::Symbol => "symbol",
            TypeTag::Function => "function",
            TypeTag::Object => "object",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown type tag name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTypeTag(pub String);

impl fmt::Display for UnknownTypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown type tag: {}", self.0)
    }
}

impl std::error::Error for UnknownTypeTag {}

impl FromStr for TypeTag {
    type Err = UnknownTypeTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeTag::ALL
            .iter()
            .copied()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| UnknownTypeTag(s.to_string()))
    }
}

/// Dispatch category of a value.
///
/// The conversion engine matches on this instead of on class names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Absent value
    Undefined,
    /// Explicit null
    Null,
    /// Boolean, number, large integer or string
    Scalar,
    /// Symbol, stored as its string form
    Symbol,
    /// Reference, geo point, timestamp, field value or date
    StoreNative,
    /// Function value
    Function,
    /// Array of values
    Array,
    /// Plain record without a class
    PlainObject,
    /// Instance of a named class
    Instance,
    /// Host value matching no other kind
    Unknown,
}
