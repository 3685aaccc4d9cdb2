//! Reverse conversion: storable value → application value.
//!
//! Dispatch order, first match wins:
//!
//! 1. custom converter by type tag, then by constructor name
//! 2. store timestamps become `Value::Date`
//! 3. arrays element by element
//! 4. objects tagged `"Array"` become nested arrays (`multidimensionalArrays: convert` only)
//! 5. objects tagged `"Function"` become functions (`functions: convert` only)
//! 6. any other object becomes a plain object, field by field
//! 7. everything else unchanged
//!
//! Class identity is not rebuilt: an object tagged with a class name comes
//! back as a plain object that still carries the reserved key.

use crate::converter::ValueConverter;
use crate::error::{ConvertError, Result};
use crate::policy::{FunctionPolicy, MultidimensionalArrayPolicy};
use crate::registry::Conversion;
use crate::typed_object::{self, HoleBudget, ARRAY_TAG, FUNCTION_TAG};
use value_core::{DocumentSnapshot, FunctionValue, Map, Value};

impl ValueConverter {
    /// Convert a stored value back into an application value.
    ///
    /// Empty slots created while decoding sparse encoded arrays are limited
    /// to the policy's `max_array_holes` for the whole call.
    pub fn from_store(&self, value: Value) -> Result<Value> {
        let mut budget = HoleBudget::new(self.policy.max_array_holes);
        self.from_store_value(value, &mut budget)
    }

    fn from_store_value(&self, value: Value, budget: &mut HoleBudget) -> Result<Value> {
        if let Conversion::Handled(converted) = self.from_store_converters.apply(&value)? {
            return Ok(converted);
        }

        match value {
            Value::Timestamp(ts) => match ts.to_datetime() {
                Some(dt) => Ok(Value::Date(dt)),
                None => {
                    tracing::warn!(
                        seconds = ts.seconds,
                        nanoseconds = ts.nanoseconds,
                        "Timestamp out of date range; keeping it as a timestamp"
                    );
                    Ok(Value::Timestamp(ts))
                }
            },

            Value::Array(elements) => Ok(Value::Array(
                elements
                    .into_iter()
                    .map(|element| self.from_store_value(element, budget))
                    .collect::<Result<Vec<_>>>()?,
            )),

            Value::Object(map) => self.from_store_object(map, budget),

            Value::Instance(instance) => {
                Ok(Value::Object(self.convert_map(instance.fields, budget)?))
            }

            other => Ok(other),
        }
    }

    /// Read a document snapshot and convert its data.
    ///
    /// Returns `None` for a missing document.
    pub fn from_snapshot<S>(&self, snapshot: &S) -> Result<Option<Value>>
    where
        S: DocumentSnapshot + ?Sized,
    {
        match snapshot.data() {
            Some(data) => self.from_store(data).map(Some),
            None => {
                tracing::debug!(id = snapshot.id(), "Snapshot has no data");
                Ok(None)
            }
        }
    }

    /// Convert a batch of snapshots into `(id, value)` pairs.
    ///
    /// Missing documents are skipped. The first failing document fails the
    /// whole batch.
    pub fn from_snapshots<'a, S, I>(&self, snapshots: I) -> Result<Vec<(String, Value)>>
    where
        S: DocumentSnapshot + ?Sized + 'a,
        I: IntoIterator<Item = &'a S>,
    {
        let mut documents = Vec::new();
        for snapshot in snapshots {
            if let Some(value) = self.from_snapshot(snapshot)? {
                documents.push((snapshot.id().to_string(), value));
            }
        }
        Ok(documents)
    }

    fn from_store_object(&self, map: Map, budget: &mut HoleBudget) -> Result<Value> {
        let key = self.policy.constructor_key.as_str();
        let tag = typed_object::tag_of(&map, key).map(str::to_owned);
        match tag.as_deref() {
            Some(ARRAY_TAG)
                if self.policy.multidimensional_arrays == MultidimensionalArrayPolicy::Convert =>
            {
                tracing::debug!(len = map.len() - 1, "Decoding typed object as nested array");
                let elements = typed_object::decode_array(map, key, budget)?
                    .into_iter()
                    .map(|slot| match slot {
                        Some(element) => self.from_store_value(element, budget),
                        None => Ok(Value::Undefined),
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Value::Array(elements))
            }
            Some(FUNCTION_TAG) if self.policy.functions == FunctionPolicy::Convert => {
                match typed_object::decode_function(&map) {
                    Some(function) => self.rebuild_function(function),
                    None => {
                        tracing::warn!("Typed function object has no source text");
                        Ok(Value::Object(self.convert_map(map, budget)?))
                    }
                }
            }
            _ => Ok(Value::Object(self.convert_map(map, budget)?)),
        }
    }

    fn rebuild_function(&self, function: FunctionValue) -> Result<Value> {
        match &self.function_compiler {
            Some(compiler) => {
                tracing::debug!(name = %function.name, "Compiling stored function");
                compiler
                    .compile(&function)
                    .map_err(|source| ConvertError::FunctionCompile {
                        name: function.name.clone(),
                        source,
                    })
            }
            None => Ok(Value::Function(function)),
        }
    }

    fn convert_map(&self, map: Map, budget: &mut HoleBudget) -> Result<Map> {
        map.into_iter()
            .map(|(name, value)| {
                self.from_store_value(value, budget)
                    .map(|value| (name, value))
            })
            .collect()
    }
}
