//! Round-trip tests for the value converter.
//!
//! These exercise both conversion directions together, the way an
//! application writes a document and later reads it back.

use firestore_convert::prelude::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging for tests
fn init_logging() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}

fn round_trip(converter: &ValueConverter, value: Value) -> Value {
    let stored = converter.to_store(value).unwrap();
    converter.from_store(stored).unwrap()
}

#[test]
fn test_scalars_round_trip_unchanged() {
    init_logging();
    let converter = ValueConverter::default();
    let scalars = [
        Value::Int(0),
        Value::Int(i64::MIN),
        Value::Float(-1.25),
        Value::Bool(true),
        Value::from(""),
        Value::from("unicode ✓"),
        Value::BigInt(i128::MIN),
    ];
    for v in scalars {
        assert_eq!(converter.to_store(v.clone()).unwrap(), v);
        assert_eq!(converter.from_store(v.clone()).unwrap(), v);
    }
}

#[test]
fn test_plain_data_round_trips() {
    init_logging();
    let converter = ValueConverter::default();
    let doc = Value::from(serde_json::json!({
        "name": "Ada",
        "age": 36,
        "ratio": 0.5,
        "tags": ["math", "engines"],
        "address": {"city": "London", "lines": ["12 St James's Square"]},
        "spouse": null,
    }));
    assert_eq!(round_trip(&converter, doc.clone()), doc);
}

#[test]
fn test_nested_arrays_round_trip() {
    init_logging();
    let converter = ValueConverter::default();
    let matrix = Value::array([Value::array([1, 2]), Value::array([3, 4])]);

    let stored = converter.to_store(matrix.clone()).unwrap();
    let rows = stored.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    for row in rows {
        let map = row.as_object().unwrap();
        assert_eq!(map.get("_constructor"), Some(&Value::from("Array")));
        assert!(map.contains_key("0"));
        assert!(map.contains_key("1"));
    }

    assert_eq!(converter.from_store(stored).unwrap(), matrix);
}

#[test]
fn test_deeply_nested_arrays_round_trip() {
    let converter = ValueConverter::default();
    let cube = Value::array([Value::array([
        Value::array([1, 2]),
        Value::array([3, 4]),
    ])]);
    assert_eq!(round_trip(&converter, cube.clone()), cube);
}

#[test]
fn test_nested_array_error_and_omit() {
    let error = ValueConverter::new(
        ConversionPolicy::new().with_multidimensional_arrays(MultidimensionalArrayPolicy::Error),
    )
    .unwrap();
    assert!(matches!(
        error.to_store(Value::array([Value::array([1, 2])])),
        Err(ConvertError::Unsupported { .. })
    ));

    // omitted inner arrays are compacted out of the outer array
    let omit = ValueConverter::new(
        ConversionPolicy::new().with_multidimensional_arrays(MultidimensionalArrayPolicy::Omit),
    )
    .unwrap();
    let stored = omit
        .to_store(Value::array([Value::Int(1), Value::array([2]), Value::Int(3)]))
        .unwrap();
    assert_eq!(stored, Value::array([1, 3]));
}

#[test]
fn test_undefined_policies() {
    let doc = Value::object([("a", Value::Int(1)), ("b", Value::Undefined)]);

    let omit = ValueConverter::default();
    let stored = omit.to_store(doc.clone()).unwrap();
    assert_eq!(stored.get("b"), None);

    let null = ValueConverter::new(
        ConversionPolicy::new().with_undefined_values(UndefinedPolicy::Null),
    )
    .unwrap();
    let stored = null.to_store(doc).unwrap();
    assert_eq!(stored.get("b"), Some(&Value::Null));
}

#[test]
fn test_class_instance_is_lossy_by_default() {
    init_logging();
    let converter = ValueConverter::default();
    let point = Value::Instance(Instance::new("Point").with_field("x", 1).with_field("y", 2));

    let stored = converter.to_store(point).unwrap();
    let expected = Value::object([
        ("x", Value::Int(1)),
        ("y", Value::Int(2)),
        ("_constructor", Value::from("Point")),
    ]);
    assert_eq!(stored, expected);

    let restored = converter.from_store(stored).unwrap();
    assert_eq!(restored, expected);
    assert!(restored.as_instance().is_none());
}

#[test]
fn test_error_round_trip_with_custom_converters() {
    init_logging();
    let converter = ValueConverter::builder()
        .to_store_class("Error", |v| {
            let message = v.get("message").cloned().unwrap_or(Value::Undefined);
            Ok(Conversion::Handled(Value::object([
                ("_constructor", Value::from("Error")),
                ("message", message),
            ])))
        })
        .from_store_tag(TypeTag::Object, |v| {
            if v.get("_constructor") != Some(&Value::from("Error")) {
                return Ok(Conversion::Continue);
            }
            let message = v.get("message").and_then(Value::as_str).unwrap_or_default();
            Ok(Conversion::Handled(Value::Instance(
                Instance::new("Error").with_field("message", message),
            )))
        })
        .build()
        .unwrap();

    let err = Value::Instance(Instance::new("Error").with_field("message", "x"));
    let doc = Value::object([("failure", err.clone()), ("attempts", Value::Int(3))]);

    let restored = round_trip(&converter, doc);
    assert_eq!(restored.get("failure"), Some(&err));
    assert_eq!(restored.get("attempts"), Some(&Value::Int(3)));
}

#[test]
fn test_continue_falls_through_to_default_dispatch() {
    let converter = ValueConverter::builder()
        .to_store_tag(TypeTag::Number, |v| match v {
            Value::Int(13) => Ok(Conversion::Handled(Value::from("thirteen"))),
            _ => Ok(Conversion::Continue),
        })
        .build()
        .unwrap();

    let stored = converter
        .to_store(Value::array([Value::Int(12), Value::Int(13), Value::Int(14)]))
        .unwrap();
    assert_eq!(
        stored,
        Value::array([Value::Int(12), Value::from("thirteen"), Value::Int(14)])
    );
}

#[test]
fn test_functions_round_trip_as_inert_values() {
    let converter = ValueConverter::new(
        ConversionPolicy::new().with_functions(FunctionPolicy::Convert),
    )
    .unwrap();
    let handler = Value::Function(FunctionValue::new("onSave", "function onSave() {}"));
    let doc = Value::object([("hooks", Value::array([handler.clone()]))]);
    let restored = round_trip(&converter, doc);
    assert_eq!(restored.get("hooks"), Some(&Value::array([handler])));
}

#[test]
fn test_store_native_values_survive_round_trip() {
    use chrono::{TimeZone, Utc};

    let converter = ValueConverter::default();
    let dt = Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap();
    let doc = Value::object([
        ("owner", Value::Reference(DocumentReference::new("users/ada"))),
        ("where", Value::GeoPoint(GeoPoint::new(51.5, -0.1))),
        ("when", Value::Timestamp(Timestamp::from(dt))),
        ("created", Value::Date(dt)),
    ]);
    let restored = round_trip(&converter, doc);
    assert_eq!(
        restored.get("owner"),
        Some(&Value::Reference(DocumentReference::new("users/ada")))
    );
    assert_eq!(
        restored.get("where"),
        Some(&Value::GeoPoint(GeoPoint::new(51.5, -0.1)))
    );
    // timestamps come back as dates
    assert_eq!(restored.get("when"), Some(&Value::Date(dt)));
    assert_eq!(restored.get("created"), Some(&Value::Date(dt)));
}

#[test]
fn test_one_bad_value_fails_the_whole_document() {
    let converter = ValueConverter::new(
        ConversionPolicy::new().with_fallback(FallbackPolicy::Error),
    )
    .unwrap();
    let doc = Value::object([
        ("fine", Value::Int(1)),
        (
            "deep",
            Value::object([("bad", Value::Opaque(Opaque::new("WeakRef", "[object WeakRef]")))]),
        ),
    ]);
    let err = converter.to_store(doc).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Unsupported Unknown value: 'fallback' is set to 'error'"
    );
}
