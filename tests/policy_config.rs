//! Tests for loading conversion policies from configuration files and
//! reading documents through snapshots.

use firestore_convert::errors::{error_value, ErrorConvertersExt};
use firestore_convert::prelude::*;
use serde_json::json;
use std::io::Write;

fn write_config(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_yaml_policy_drives_conversion() {
    let file = write_config(
        ".yaml",
        r#"
undefinedValues: "null"
multidimensionalArrays: error
functions: convert
constructorKey: __type_tag
"#,
    );
    let policy = ConversionPolicy::from_file(file.path()).unwrap();
    let converter = ValueConverter::new(policy).unwrap();

    let stored = converter
        .to_store(Value::object([
            ("missing", Value::Undefined),
            ("f", Value::Function(FunctionValue::new("f", "() => 0"))),
        ]))
        .unwrap();
    assert_eq!(stored.get("missing"), Some(&Value::Null));
    assert_eq!(
        stored.get("f").and_then(|f| f.get("__type_tag")),
        Some(&Value::from("Function"))
    );

    assert!(converter
        .to_store(Value::array([Value::array([1])]))
        .is_err());
}

#[test]
fn test_toml_policy_defaults_unset_fields() {
    let file = write_config(".toml", "fallback = \"omit\"\n");
    let policy = ConversionPolicy::from_file(file.path()).unwrap();
    assert_eq!(policy.fallback, FallbackPolicy::Omit);
    assert_eq!(policy.undefined_values, UndefinedPolicy::Omit);
    assert_eq!(policy.constructor_key, "_constructor");
}

#[test]
fn test_bad_mode_in_config_is_rejected() {
    let file = write_config(".yml", "multidimensionalArrays: flatten\n");
    let err = ConversionPolicy::from_file(file.path()).unwrap_err();
    assert!(err
        .to_string()
        .contains("Invalid value 'flatten' for policy 'multidimensionalArrays'"));
}

#[test]
fn test_missing_config_file() {
    let err = ConversionPolicy::from_file("/nonexistent/policy.yaml").unwrap_err();
    assert!(matches!(err, PolicyError::Io(_)));
}

#[test]
fn test_snapshots_with_error_converters() {
    let converter = ValueConverter::builder().error_converters().build().unwrap();

    let job = Value::object([
        ("status", Value::from("failed")),
        ("error", error_value("Error", "disk full")),
        ("matrix", Value::array([Value::array([1, 2])])),
    ]);
    let stored = converter.to_store(job.clone()).unwrap();

    let snapshots = vec![
        JsonSnapshot::new("job-1", stored.to_json()),
        JsonSnapshot::missing("job-2"),
    ];
    let docs = converter.from_snapshots(&snapshots).unwrap();
    assert_eq!(docs.len(), 1);
    let (id, restored) = &docs[0];
    assert_eq!(id, "job-1");
    assert_eq!(restored, &job);
}

#[test]
fn test_snapshot_timestamps_become_dates() {
    let converter = ValueConverter::default();
    let snapshot = JsonSnapshot::new(
        "event",
        json!({
            "at": {"__type": "Timestamp", "seconds": 1_700_000_000, "nanoseconds": 500},
            "place": {"__type": "GeoPoint", "latitude": 10.0, "longitude": 20.0},
        }),
    );
    let value = converter.from_snapshot(&snapshot).unwrap().unwrap();
    let expected_at = Timestamp::new(1_700_000_000, 500).to_datetime().unwrap();
    assert_eq!(value.get("at"), Some(&Value::Date(expected_at)));
    assert_eq!(
        value.get("place"),
        Some(&Value::GeoPoint(GeoPoint::new(10.0, 20.0)))
    );
}
