//! Core value types for the firestore-convert workspace.
//!
//! This crate provides the foundational types used by the conversion
//! engine:
//!
//! - [`Value`] - Application value graph (both sides of a conversion)
//! - [`TypeTag`] / [`ValueKind`] - Inspection results used for dispatch
//! - [`DocumentReference`], [`GeoPoint`], [`Timestamp`], [`FieldValue`] - Store-native types
//! - [`DocumentSnapshot`] - Read-side collaborator handing back stored documents
//!
//! # Architecture
//!
//! ```text
//! value-core (this crate)
//!    │
//!    └─── firestore-types   (policy-driven Value <-> storable Value conversion)
//! ```
//!
//! # Example
//!
//! ```rust
//! use value_core::{Instance, TypeTag, Value, ValueKind};
//!
//! let point = Value::from(Instance::new("Point").with_field("x", 1).with_field("y", 2));
//! assert_eq!(point.type_tag(), TypeTag::Object);
//! assert_eq!(point.kind(), ValueKind::Instance);
//! assert_eq!(point.constructor_name(), Some("Point"));
//! ```

pub mod json;
pub mod native;
pub mod snapshot;
pub mod types;
pub mod values;

// Re-exports for convenience
pub use json::NATIVE_TYPE_KEY;
pub use native::{DocumentReference, FieldValue, GeoPoint, Timestamp};
pub use snapshot::{DocumentSnapshot, JsonSnapshot};
pub use types::{TypeTag, UnknownTypeTag, ValueKind};
pub use values::{FunctionValue, Instance, Map, Opaque, Value};
