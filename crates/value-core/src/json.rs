//! JSON interop for application values.
//!
//! JSON documents map onto plain values. Store-native types travel through
//! JSON as objects carrying a [`NATIVE_TYPE_KEY`] marker, e.g.
//! `{"__type": "GeoPoint", "latitude": 1.0, "longitude": 2.0}`.

use crate::native::{DocumentReference, FieldValue, GeoPoint, Timestamp};
use crate::values::{Map, Value};
use serde_json::json;

/// Marker key identifying a store-native value encoded as a JSON object.
pub const NATIVE_TYPE_KEY: &str = "__type";

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::BigInt(u as i128)
                } else if let Some(f) = n.as_f64() {
                    Value::Float(f)
                } else {
                    Value::String(n.to_string())
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(arr) => {
                Value::Array(arr.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(obj) => {
                if let Some(native) = native_from_json(&obj) {
                    return native;
                }
                Value::Object(
                    obj.into_iter()
                        .map(|(k, v)| (k, Value::from(v)))
                        .collect::<Map>(),
                )
            }
        }
    }
}

/// Recognize a store-native value encoded as a tagged JSON object.
fn native_from_json(obj: &serde_json::Map<String, serde_json::Value>) -> Option<Value> {
    match obj.get(NATIVE_TYPE_KEY)?.as_str()? {
        "DocumentReference" => {
            let path = obj.get("path")?.as_str()?;
            Some(Value::Reference(DocumentReference::new(path)))
        }
        "GeoPoint" => {
            let latitude = obj.get("latitude")?.as_f64()?;
            let longitude = obj.get("longitude")?.as_f64()?;
            Some(Value::GeoPoint(GeoPoint::new(latitude, longitude)))
        }
        "Timestamp" => {
            let seconds = obj.get("seconds")?.as_i64()?;
            let nanoseconds = obj
                .get("nanoseconds")
                .and_then(serde_json::Value::as_u64)
                .unwrap_or(0);
            let nanoseconds = u32::try_from(nanoseconds).ok()?;
            Some(Value::Timestamp(Timestamp::new(seconds, nanoseconds)))
        }
        _ => None,
    }
}

impl Value {
    /// Render this value as JSON.
    ///
    /// Values JSON cannot express natively render as tagged objects or
    /// strings. `Undefined` renders as `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Undefined | Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => json!(i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::BigInt(i) => match i64::try_from(*i) {
                Ok(small) => json!(small),
                Err(_) => serde_json::Value::String(i.to_string()),
            },
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Symbol(description) => {
                serde_json::Value::String(format!("Symbol({description})"))
            }
            Value::Function(function) => json!({
                NATIVE_TYPE_KEY: "Function",
                "name": function.name,
                "source": function.source,
            }),
            Value::Array(arr) => serde_json::Value::Array(arr.iter().map(Value::to_json).collect()),
            Value::Object(map) => map_to_json(map, None),
            Value::Instance(instance) => map_to_json(&instance.fields, Some(&instance.class_name)),
            Value::Date(dt) => serde_json::Value::String(dt.to_rfc3339()),
            Value::Reference(r) => json!({
                NATIVE_TYPE_KEY: "DocumentReference",
                "path": r.path,
            }),
            Value::GeoPoint(p) => json!({
                NATIVE_TYPE_KEY: "GeoPoint",
                "latitude": p.latitude,
                "longitude": p.longitude,
            }),
            Value::Timestamp(ts) => json!({
                NATIVE_TYPE_KEY: "Timestamp",
                "seconds": ts.seconds,
                "nanoseconds": ts.nanoseconds,
            }),
            Value::FieldValue(fv) => field_value_to_json(fv),
            Value::Opaque(opaque) => json!({
                NATIVE_TYPE_KEY: opaque.type_name,
                "repr": opaque.repr,
            }),
        }
    }
}

fn map_to_json(map: &Map, type_name: Option<&str>) -> serde_json::Value {
    let mut obj = serde_json::Map::new();
    if let Some(type_name) = type_name {
        obj.insert(NATIVE_TYPE_KEY.to_string(), json!(type_name));
    }
    for (k, v) in map {
        obj.insert(k.clone(), v.to_json());
    }
    serde_json::Value::Object(obj)
}

fn field_value_to_json(fv: &FieldValue) -> serde_json::Value {
    let mut obj = serde_json::Map::new();
    obj.insert(NATIVE_TYPE_KEY.to_string(), json!("FieldValue"));
    obj.insert("kind".to_string(), json!(fv.kind()));
    match fv {
        FieldValue::ServerTimestamp | FieldValue::Delete => {}
        FieldValue::Increment(operand) => {
            obj.insert("operand".to_string(), json!(operand));
        }
        FieldValue::ArrayUnion(elements) | FieldValue::ArrayRemove(elements) => {
            obj.insert(
                "elements".to_string(),
                serde_json::Value::Array(elements.iter().map(Value::to_json).collect()),
            );
        }
    }
    serde_json::Value::Object(obj)
}
