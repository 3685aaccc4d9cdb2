//! Round-tripping error instances.
//!
//! Class instances lose their identity in the store by default. Errors are
//! common enough in stored documents (failed jobs, audit trails) that this
//! module ships a converter pair for them: outbound, an error instance is
//! stored as `{message, stack?, <key>: "<class>"}`; inbound, an object tagged
//! with a known error class is rebuilt as an instance of that class.

use firestore_types::{Conversion, ValueConverterBuilder};
use value_core::{Instance, Map, TypeTag, Value};

/// Error class names handled by [`ErrorConvertersExt::error_converters`].
pub const ERROR_CLASSES: [&str; 6] = [
    "Error",
    "TypeError",
    "RangeError",
    "SyntaxError",
    "ReferenceError",
    "EvalError",
];

const MESSAGE_FIELD: &str = "message";
const STACK_FIELD: &str = "stack";

/// Build an error instance with the given message.
pub fn error_value(class_name: &str, message: impl Into<String>) -> Value {
    Value::Instance(Instance::new(class_name).with_field(MESSAGE_FIELD, message.into()))
}

/// Message of an error instance, if the value is one.
pub fn error_message(value: &Value) -> Option<&str> {
    let instance = value.as_instance()?;
    if !ERROR_CLASSES.contains(&instance.class_name.as_str()) {
        return None;
    }
    instance.get(MESSAGE_FIELD).and_then(Value::as_str)
}

/// Encode an error instance as a tagged object.
fn encode_error(value: &Value, constructor_key: &str) -> anyhow::Result<Conversion> {
    let Some(instance) = value.as_instance() else {
        return Ok(Conversion::Continue);
    };
    let message = match instance.get(MESSAGE_FIELD) {
        Some(Value::String(message)) => message.clone(),
        Some(other) => anyhow::bail!(
            "{} message must be a string, got {:?}",
            instance.class_name,
            other.kind()
        ),
        None => String::new(),
    };

    let mut map = Map::new();
    map.insert(MESSAGE_FIELD.to_string(), Value::String(message));
    if let Some(Value::String(stack)) = instance.get(STACK_FIELD) {
        map.insert(STACK_FIELD.to_string(), Value::String(stack.clone()));
    }
    map.insert(
        constructor_key.to_string(),
        Value::String(instance.class_name.clone()),
    );
    Ok(Conversion::Handled(Value::Object(map)))
}

/// Rebuild an error instance from a tagged object.
fn decode_error(value: &Value, constructor_key: &str) -> anyhow::Result<Conversion> {
    let Some(map) = value.as_object() else {
        return Ok(Conversion::Continue);
    };
    let class_name = match map.get(constructor_key).and_then(Value::as_str) {
        Some(tag) if ERROR_CLASSES.contains(&tag) => tag,
        _ => return Ok(Conversion::Continue),
    };

    let mut instance = Instance::new(class_name);
    for field in [MESSAGE_FIELD, STACK_FIELD] {
        if let Some(Value::String(text)) = map.get(field) {
            instance = instance.with_field(field, text.as_str());
        }
    }
    tracing::trace!(class_name, "Rebuilt error instance");
    Ok(Conversion::Handled(Value::Instance(instance)))
}

/// Adds error converters to a [`ValueConverterBuilder`].
pub trait ErrorConvertersExt {
    /// Register the outbound and inbound error converters.
    ///
    /// Uses the builder's current constructor key, so set the policy first.
    /// The inbound converter is registered on the `object` tag and continues
    /// for every object that is not a tagged error. It joins any `object`
    /// converters already registered and runs after them.
    fn error_converters(self) -> Self;
}

impl ErrorConvertersExt for ValueConverterBuilder {
    fn error_converters(self) -> Self {
        let key = self.current_policy().constructor_key.clone();

        let mut builder = self;
        for class_name in ERROR_CLASSES {
            let key = key.clone();
            builder = builder.to_store_class(class_name, move |v| encode_error(v, &key));
        }
        builder.from_store_tag(TypeTag::Object, move |v| decode_error(v, &key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use firestore_types::{ConversionPolicy, ValueConverter};

    fn converter() -> ValueConverter {
        ValueConverter::builder().error_converters().build().unwrap()
    }

    #[test]
    fn test_error_round_trip() {
        let c = converter();
        let err = error_value("Error", "x");
        let stored = c.to_store(err.clone()).unwrap();
        assert_eq!(
            stored,
            Value::object([("message", "x"), ("_constructor", "Error")])
        );
        let restored = c.from_store(stored).unwrap();
        assert_eq!(restored, err);
        assert_eq!(error_message(&restored), Some("x"));
    }

    #[test]
    fn test_error_subclass_and_stack() {
        let c = converter();
        let err = Value::Instance(
            Instance::new("TypeError")
                .with_field("message", "bad type")
                .with_field("stack", "TypeError: bad type\n    at f"),
        );
        let restored = c.from_store(c.to_store(err.clone()).unwrap()).unwrap();
        assert_eq!(restored, err);
    }

    #[test]
    fn test_extra_error_fields_are_dropped() {
        let c = converter();
        let err = Value::Instance(
            Instance::new("Error")
                .with_field("message", "boom")
                .with_field("code", 42),
        );
        let stored = c.to_store(err).unwrap();
        assert_eq!(stored.get("code"), None);
    }

    #[test]
    fn test_non_string_message_fails() {
        let c = converter();
        let err = Value::Instance(Instance::new("Error").with_field("message", 1));
        assert!(c.to_store(err).is_err());
    }

    #[test]
    fn test_other_objects_continue() {
        let c = converter();
        let point = Value::object([
            ("x", Value::Int(1)),
            ("_constructor", Value::from("Point")),
        ]);
        assert_eq!(c.from_store(point.clone()).unwrap(), point);
        assert_eq!(error_message(&point), None);
    }

    #[test]
    fn test_keeps_existing_object_converter() {
        let c = ValueConverter::builder()
            .from_store_tag(TypeTag::Object, |v| {
                if v.get("_constructor") == Some(&Value::from("Money")) {
                    return Ok(Conversion::Handled(Value::from("money")));
                }
                Ok(Conversion::Continue)
            })
            .error_converters()
            .build()
            .unwrap();

        let money = Value::object([("cents", Value::Int(5)), ("_constructor", Value::from("Money"))]);
        assert_eq!(c.from_store(money).unwrap(), Value::from("money"));

        let stored = c.to_store(error_value("Error", "still works")).unwrap();
        assert_eq!(
            c.from_store(stored).unwrap(),
            error_value("Error", "still works")
        );
    }

    #[test]
    fn test_uses_configured_constructor_key() {
        let c = ValueConverter::builder()
            .policy(ConversionPolicy::new().with_constructor_key("__class"))
            .error_converters()
            .build()
            .unwrap();
        let stored = c.to_store(error_value("RangeError", "too far")).unwrap();
        assert_eq!(stored.get("__class"), Some(&Value::from("RangeError")));
        assert_eq!(
            c.from_store(stored).unwrap(),
            error_value("RangeError", "too far")
        );
    }
}
