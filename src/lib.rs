//! firestore-convert
//!
//! Converts arbitrary application value graphs into the value subset a
//! Firestore-style document store accepts, and converts stored documents
//! back into application values.
//!
//! # Crates
//!
//! - `value_core` - Application value model, store-native types, snapshots
//! - `firestore_types` - Conversion policy, custom converters and the converter itself
//!
//! This crate re-exports both and adds ready-made converters for common
//! application types in [`errors`].
//!
//! # Example
//!
//! ```rust
//! use firestore_convert::prelude::*;
//!
//! let converter = ValueConverter::new(
//!     ConversionPolicy::new().with_undefined_values(UndefinedPolicy::Null),
//! )
//! .unwrap();
//!
//! let doc = Value::object([("name", Value::from("Ada")), ("nickname", Value::Undefined)]);
//! let stored = converter.to_store(doc).unwrap();
//! assert_eq!(stored.get("nickname"), Some(&Value::Null));
//! ```

pub mod errors;

pub use firestore_types;
pub use value_core;

pub use firestore_types::{
    ConversionPolicy, ConvertError, PolicyError, ValueConverter, ValueConverterBuilder,
};
pub use value_core::{DocumentSnapshot, Value};

/// Everything needed to build and run a converter.
pub mod prelude {
    pub use firestore_types::{
        ClassInstancePolicy, Conversion, ConversionPolicy, ConvertError, ConverterRegistry,
        FallbackPolicy, FunctionCompiler, FunctionPolicy, MultidimensionalArrayPolicy,
        PolicyError, UndefinedPolicy, ValueConverter, ValueConverterBuilder,
    };
    pub use value_core::{
        DocumentReference, DocumentSnapshot, FieldValue, FunctionValue, GeoPoint, Instance,
        JsonSnapshot, Map, Opaque, Timestamp, TypeTag, Value, ValueKind,
    };
}
