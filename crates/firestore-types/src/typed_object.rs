//! Typed plain object codec.
//!
//! The store only holds flat objects and single-level arrays. Nested arrays,
//! functions and class instances are written as plain objects with one
//! reserved key (the policy's `constructor_key`) naming what they were:
//!
//! ```text
//! [[1, 2]]                  -> [{"0": 1, "1": 2, "_constructor": "Array"}]
//! function add(a, b) {..}   -> {"name": "add", "string": "function add..", "_constructor": "Function"}
//! Point { x: 1, y: 2 }      -> {"x": 1, "y": 2, "_constructor": "Point"}
//! ```
//!
//! Only arrays and functions are decoded again. Other class names have no
//! registry to rebuild them from, so they come back as plain objects.

use crate::error::{ConvertError, Result};
use value_core::{FunctionValue, Map, Value};

/// Tag of an encoded nested array.
pub const ARRAY_TAG: &str = "Array";

/// Tag of an encoded function.
pub const FUNCTION_TAG: &str = "Function";

/// Field holding an encoded function's name.
pub const FUNCTION_NAME_FIELD: &str = "name";

/// Field holding an encoded function's source text.
pub const FUNCTION_SOURCE_FIELD: &str = "string";

/// Allowance of empty array slots shared by every encoded array decoded
/// during one inbound conversion.
///
/// A stored `{"1000000": 1, "_constructor": "Array"}` takes a few bytes but
/// decodes into a million slots, so holes are charged here before anything
/// is allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoleBudget {
    remaining: usize,
}

impl HoleBudget {
    /// Create a budget allowing `limit` holes in total.
    pub fn new(limit: usize) -> Self {
        Self { remaining: limit }
    }

    /// Holes still available.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Take `holes` from the budget, or fail without taking any.
    pub fn charge(&mut self, holes: usize) -> Result<()> {
        if holes > self.remaining {
            return Err(ConvertError::SparseArray {
                holes,
                remaining: self.remaining,
            });
        }
        self.remaining -= holes;
        Ok(())
    }
}

/// Encode fields as a typed plain object, converting each field value.
///
/// Fields whose converted value is `Undefined` are dropped. The reserved key
/// is written last and overwrites a data field of the same name.
pub fn encode<I, F>(fields: I, tag: &str, constructor_key: &str, mut convert: F) -> Result<Map>
where
    I: IntoIterator<Item = (String, Value)>,
    F: FnMut(Value) -> Result<Value>,
{
    let mut map = Map::new();
    for (name, value) in fields {
        let converted = convert(value)?;
        if !converted.is_undefined() {
            map.insert(name, converted);
        }
    }
    map.insert(constructor_key.to_string(), Value::String(tag.to_string()));
    Ok(map)
}

/// Encode fields as a typed plain object without converting their values.
pub fn encode_raw<I>(fields: I, tag: &str, constructor_key: &str) -> Map
where
    I: IntoIterator<Item = (String, Value)>,
{
    let mut map: Map = fields.into_iter().collect();
    map.insert(constructor_key.to_string(), Value::String(tag.to_string()));
    map
}

/// Encode a function as `{name, string}` tagged `"Function"`.
pub fn encode_function(function: FunctionValue, constructor_key: &str) -> Map {
    encode_raw(
        [
            (
                FUNCTION_NAME_FIELD.to_string(),
                Value::String(function.name),
            ),
            (
                FUNCTION_SOURCE_FIELD.to_string(),
                Value::String(function.source),
            ),
        ],
        FUNCTION_TAG,
        constructor_key,
    )
}

/// Read the type tag of a typed plain object.
pub fn tag_of<'a>(map: &'a Map, constructor_key: &str) -> Option<&'a str> {
    map.get(constructor_key).and_then(Value::as_str)
}

/// Decode an object tagged `"Array"` into its slots, without converting them.
///
/// Every key other than the reserved key is an index. Missing indices come
/// back as `None` and are charged to `budget` before the slots are
/// allocated. Keys that are not indices are skipped with a warning.
pub fn decode_array(
    map: Map,
    constructor_key: &str,
    budget: &mut HoleBudget,
) -> Result<Vec<Option<Value>>> {
    let mut entries: Vec<(usize, Value)> = Vec::with_capacity(map.len());
    for (key, value) in map {
        if key == constructor_key {
            continue;
        }
        match key.parse::<usize>() {
            Ok(index) => entries.push((index, value)),
            Err(_) => tracing::warn!(key = %key, "Skipping non-index key in encoded array"),
        }
    }

    let len = entries
        .iter()
        .map(|(index, _)| index.saturating_add(1))
        .max()
        .unwrap_or(0);
    budget.charge(len.saturating_sub(entries.len()))?;

    let mut slots: Vec<Option<Value>> = Vec::new();
    slots.resize_with(len, || None);
    for (index, value) in entries {
        slots[index] = Some(value);
    }
    Ok(slots)
}

/// Decode an object tagged `"Function"` into its name and source text.
///
/// Returns `None` when the source field is missing or not a string. A
/// missing name decodes as an anonymous function.
pub fn decode_function(map: &Map) -> Option<FunctionValue> {
    let source = map.get(FUNCTION_SOURCE_FIELD)?.as_str()?;
    let name = map
        .get(FUNCTION_NAME_FIELD)
        .and_then(Value::as_str)
        .unwrap_or_default();
    Some(FunctionValue::new(name, source))
}
