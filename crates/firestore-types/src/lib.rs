//! Firestore value conversions for value-core types.
//!
//! This crate provides the bidirectional, policy-driven conversion between
//! application values and the restricted value subset a Firestore-style
//! document store accepts.
//!
//! # Modules
//!
//! - [`policy`] - Conversion policy and its YAML/TOML loading
//! - [`registry`] - Custom converter tables and the `Continue` marker
//! - [`typed_object`] - Typed plain object codec for nested arrays, functions and instances
//! - [`forward`] - Value → storable value conversion
//! - [`reverse`] - Storable value → value conversion
//!
//! # Example
//!
//! ```rust
//! use firestore_types::{ConversionPolicy, ValueConverter};
//! use value_core::{Instance, Value};
//!
//! let converter = ValueConverter::new(ConversionPolicy::default()).unwrap();
//!
//! let point = Value::from(Instance::new("Point").with_field("x", 1).with_field("y", 2));
//! let stored = converter.to_store(point).unwrap();
//! assert_eq!(stored.get("_constructor"), Some(&Value::from("Point")));
//!
//! // Class identity is not rebuilt on the way back
//! let restored = converter.from_store(stored.clone()).unwrap();
//! assert_eq!(restored, stored);
//! ```

pub mod converter;
pub mod error;
pub mod forward;
pub mod policy;
pub mod registry;
pub mod reverse;
pub mod typed_object;

pub use converter::{FunctionCompiler, ValueConverter, ValueConverterBuilder};
pub use error::{ConvertError, PolicyError, Result};
pub use policy::{
    ClassInstancePolicy, ConversionPolicy, FallbackPolicy, FunctionPolicy,
    MultidimensionalArrayPolicy, UndefinedPolicy, DEFAULT_CONSTRUCTOR_KEY, DEFAULT_MAX_ARRAY_HOLES,
};
pub use registry::{Conversion, ConverterFn, ConverterRegistry};
pub use typed_object::HoleBudget;
