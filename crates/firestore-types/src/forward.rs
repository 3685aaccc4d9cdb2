//! Forward conversion: application value → storable value.
//!
//! Dispatch order, first match wins:
//!
//! 1. custom converter by type tag, then by constructor name
//! 2. null, undefined (per `undefinedValues`)
//! 3. scalars unchanged, symbols as their string form
//! 4. store-native types and dates unchanged
//! 5. functions (per `functions`)
//! 6. arrays; an array inside an array goes through `multidimensionalArrays`
//! 7. plain objects field by field
//! 8. class instances as typed plain objects tagged with the class name
//! 9. anything else (per `fallback`)
//!
//! A result of `Value::Undefined` means "omit". Omitted object fields are
//! dropped and omitted array elements are compacted out of the array.

use crate::converter::ValueConverter;
use crate::error::{ConvertError, Result};
use crate::policy::{
    ClassInstancePolicy, FallbackPolicy, FunctionPolicy, MultidimensionalArrayPolicy,
    UndefinedPolicy,
};
use crate::registry::Conversion;
use crate::typed_object::{self, ARRAY_TAG};
use value_core::{Map, Value, ValueKind};

impl ValueConverter {
    /// Convert an application value into its storable form.
    ///
    /// Returns `Value::Undefined` when the value is omitted by policy.
    pub fn to_store(&self, value: Value) -> Result<Value> {
        self.to_store_value(value, false)
    }

    /// Convert the fields of a document, dropping omitted fields.
    ///
    /// Custom converters see each field value but not the document itself.
    pub fn to_store_document(&self, fields: Map) -> Result<Map> {
        self.convert_fields(fields)
    }

    /// Convert a value found at the given array nesting.
    ///
    /// `inside_array` is true for elements of an array, so that an array
    /// among them is recognized as multidimensional.
    pub fn to_store_value(&self, value: Value, inside_array: bool) -> Result<Value> {
        if let Conversion::Handled(converted) = self.to_store_converters.apply(&value)? {
            return Ok(converted);
        }

        let policy = &self.policy;
        match value {
            Value::Null => Ok(Value::Null),

            Value::Undefined => match policy.undefined_values {
                UndefinedPolicy::Omit => Ok(Value::Undefined),
                UndefinedPolicy::Null => Ok(Value::Null),
            },

            scalar @ (Value::Bool(_)
            | Value::Int(_)
            | Value::Float(_)
            | Value::BigInt(_)
            | Value::String(_)) => Ok(scalar),

            Value::Symbol(description) => Ok(Value::String(format!("Symbol({description})"))),

            // The store's write path serializes these itself
            native @ (Value::Date(_)
            | Value::Reference(_)
            | Value::GeoPoint(_)
            | Value::Timestamp(_)
            | Value::FieldValue(_)) => Ok(native),

            Value::Function(function) => match policy.functions {
                FunctionPolicy::Convert => {
                    tracing::debug!(name = %function.name, "Encoding function as typed object");
                    Ok(Value::Object(typed_object::encode_function(
                        function,
                        &policy.constructor_key,
                    )))
                }
                FunctionPolicy::Omit => {
                    tracing::debug!(name = %function.name, "Omitting function");
                    Ok(Value::Undefined)
                }
                FunctionPolicy::Error => Err(unsupported(
                    FunctionPolicy::POLICY,
                    policy.functions.as_str(),
                    ValueKind::Function,
                )),
            },

            Value::Array(elements) if !inside_array => {
                let mut converted = Vec::with_capacity(elements.len());
                for element in elements {
                    let element = self.to_store_value(element, true)?;
                    if !element.is_undefined() {
                        converted.push(element);
                    }
                }
                Ok(Value::Array(converted))
            }

            Value::Array(elements) => match policy.multidimensional_arrays {
                MultidimensionalArrayPolicy::Convert => {
                    tracing::debug!(len = elements.len(), "Encoding nested array as typed object");
                    let indexed = elements
                        .into_iter()
                        .enumerate()
                        .map(|(index, element)| (index.to_string(), element));
                    let map = typed_object::encode(
                        indexed,
                        ARRAY_TAG,
                        &policy.constructor_key,
                        |element| self.to_store_value(element, true),
                    )?;
                    Ok(Value::Object(map))
                }
                MultidimensionalArrayPolicy::Omit => {
                    tracing::debug!(len = elements.len(), "Omitting nested array");
                    Ok(Value::Undefined)
                }
                MultidimensionalArrayPolicy::Error => Err(unsupported(
                    MultidimensionalArrayPolicy::POLICY,
                    policy.multidimensional_arrays.as_str(),
                    ValueKind::Array,
                )),
            },

            Value::Object(fields) => Ok(Value::Object(self.convert_fields(fields)?)),

            Value::Instance(instance) => match policy.class_instances {
                ClassInstancePolicy::Convert => {
                    tracing::trace!(class_name = %instance.class_name, "Encoding class instance");
                    let map = typed_object::encode(
                        instance.fields,
                        &instance.class_name,
                        &policy.constructor_key,
                        |field| self.to_store_value(field, false),
                    )?;
                    Ok(Value::Object(map))
                }
            },

            Value::Opaque(opaque) => match policy.fallback {
                FallbackPolicy::Return => Ok(Value::Opaque(opaque)),
                FallbackPolicy::Omit => {
                    tracing::debug!(type_name = %opaque.type_name, "Omitting unrecognized value");
                    Ok(Value::Undefined)
                }
                FallbackPolicy::Error => Err(unsupported(
                    FallbackPolicy::POLICY,
                    policy.fallback.as_str(),
                    ValueKind::Unknown,
                )),
            },
        }
    }

    fn convert_fields(&self, fields: Map) -> Result<Map> {
        let mut converted = Map::with_capacity(fields.len());
        for (name, value) in fields {
            let value = self.to_store_value(value, false)?;
            if value.is_undefined() {
                tracing::trace!(field = %name, "Dropping omitted field");
            } else {
                converted.insert(name, value);
            }
        }
        Ok(converted)
    }
}

fn unsupported(policy: &'static str, mode: &'static str, kind: ValueKind) -> ConvertError {
    ConvertError::Unsupported { policy, mode, kind }
}
