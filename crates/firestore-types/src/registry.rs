//! Custom converter table.
//!
//! A [`ConverterRegistry`] holds user overrides for one conversion
//! direction. Lookups go by [`TypeTag`] first and then by constructor name.
//! A matching converter runs before any built-in case and either produces
//! the final value or declines with [`Conversion::Continue`].
//!
//! Registering under a key that already has converters adds to them rather
//! than replacing them. Converters for one key run in registration order
//! until one returns [`Conversion::Handled`].

use crate::error::{ConvertError, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use value_core::{TypeTag, Value};

/// Result of a custom converter.
#[derive(Debug, Clone, PartialEq)]
pub enum Conversion {
    /// Final converted value; skips all built-in handling
    Handled(Value),
    /// Declined; fall through to the next lookup or built-in handling
    Continue,
}

/// Custom converter function.
pub type ConverterFn = Arc<dyn Fn(&Value) -> anyhow::Result<Conversion> + Send + Sync>;

/// Registry of custom converters for one direction.
#[derive(Clone, Default)]
pub struct ConverterRegistry {
    by_tag: HashMap<TypeTag, Vec<ConverterFn>>,
    by_class: HashMap<String, Vec<ConverterFn>>,
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<&TypeTag> = self.by_tag.keys().collect();
        tags.sort_by_key(|tag| tag.as_str());
        let mut classes: Vec<&String> = self.by_class.keys().collect();
        classes.sort();
        f.debug_struct("ConverterRegistry")
            .field("by_tag", &tags)
            .field("by_class", &classes)
            .finish()
    }
}

impl ConverterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a converter for a runtime type tag, after any already registered.
    pub fn register_tag<F>(&mut self, tag: TypeTag, converter: F) -> &mut Self
    where
        F: Fn(&Value) -> anyhow::Result<Conversion> + Send + Sync + 'static,
    {
        self.by_tag
            .entry(tag)
            .or_default()
            .push(Arc::new(converter));
        self
    }

    /// Register a converter for a constructor name, after any already registered.
    pub fn register_class<F>(&mut self, class_name: impl Into<String>, converter: F) -> &mut Self
    where
        F: Fn(&Value) -> anyhow::Result<Conversion> + Send + Sync + 'static,
    {
        self.by_class
            .entry(class_name.into())
            .or_default()
            .push(Arc::new(converter));
        self
    }

    /// Check whether no converters are registered.
    pub fn is_empty(&self) -> bool {
        self.by_tag.is_empty() && self.by_class.is_empty()
    }

    /// Run the matching converters for a value.
    ///
    /// Tag converters run first. Class converters run only if no tag
    /// converter handled the value. Returns `Continue` when nothing did.
    pub fn apply(&self, value: &Value) -> Result<Conversion> {
        let tag = value.type_tag();
        if let Some(converters) = self.by_tag.get(&tag) {
            if let handled @ Conversion::Handled(_) = run_chain(converters, value, tag.as_str())? {
                return Ok(handled);
            }
            tracing::trace!(%tag, "tag converters continued");
        }

        if let Some(class_name) = value.constructor_name() {
            if let Some(converters) = self.by_class.get(class_name) {
                let result = run_chain(converters, value, class_name)?;
                if let handled @ Conversion::Handled(_) = result {
                    return Ok(handled);
                }
                tracing::trace!(class_name, "class converters continued");
            }
        }

        Ok(Conversion::Continue)
    }
}

fn run_chain(converters: &[ConverterFn], value: &Value, key: &str) -> Result<Conversion> {
    for converter in converters {
        if let handled @ Conversion::Handled(_) = invoke(converter, value, key)? {
            return Ok(handled);
        }
    }
    Ok(Conversion::Continue)
}

fn invoke(converter: &ConverterFn, value: &Value, key: &str) -> Result<Conversion> {
    converter(value).map_err(|source| ConvertError::Custom {
        key: key.to_string(),
        source,
    })
}
