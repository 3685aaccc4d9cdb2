//! Store-native value types.
//!
//! These are the scalar types the document store understands without any
//! conversion. The converter passes them through unchanged and trusts the
//! store's write path to serialize them.

use crate::values::Value;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reference to a document, identified by its slash-separated path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentReference {
    /// Full document path, e.g. `users/alice`
    pub path: String,
}

impl DocumentReference {
    /// Create a reference from a document path.
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Last path segment (the document id).
    pub fn id(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or_default()
    }

    /// Path of the containing collection, if any.
    pub fn parent_path(&self) -> Option<&str> {
        self.path.rsplit_once('/').map(|(parent, _)| parent)
    }
}

/// Geographic point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees, -90 to 90
    pub latitude: f64,
    /// Longitude in degrees, -180 to 180
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a new geo point.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check whether both coordinates are within their valid ranges.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Store timestamp with nanosecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp {
    /// Seconds since the Unix epoch
    pub seconds: i64,
    /// Non-negative nanoseconds within the second
    pub nanoseconds: u32,
}

impl Timestamp {
    /// Create a new timestamp.
    pub fn new(seconds: i64, nanoseconds: u32) -> Self {
        Self {
            seconds,
            nanoseconds,
        }
    }

    /// Build a timestamp from a UTC date/time.
    pub fn from_datetime(dt: &DateTime<Utc>) -> Self {
        Self {
            seconds: dt.timestamp(),
            nanoseconds: dt.timestamp_subsec_nanos(),
        }
    }

    /// Convert to a UTC date/time.
    ///
    /// Returns `None` when the timestamp is outside chrono's supported range.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.seconds, self.nanoseconds)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::from_datetime(&dt)
    }
}

/// Server-side value placeholder, resolved by the store on write.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Replaced with the server's commit time
    ServerTimestamp,
    /// Deletes the field it is assigned to
    Delete,
    /// Adds the operand to the current numeric value
    Increment(f64),
    /// Appends elements not already present
    ArrayUnion(Vec<Value>),
    /// Removes all instances of the elements
    ArrayRemove(Vec<Value>),
}

impl FieldValue {
    /// Name of the placeholder operation.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::ServerTimestamp => "serverTimestamp",
            FieldValue::Delete => "delete",
            FieldValue::Increment(_) => "increment",
            FieldValue::ArrayUnion(_) => "arrayUnion",
            FieldValue::ArrayRemove(_) => "arrayRemove",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_document_reference_segments() {
        let r = DocumentReference::new("users/alice/posts/p1");
        assert_eq!(r.id(), "p1");
        assert_eq!(r.parent_path(), Some("users/alice/posts"));

        let root = DocumentReference::new("users");
        assert_eq!(root.id(), "users");
        assert_eq!(root.parent_path(), None);
    }

    #[test]
    fn test_geo_point_validity() {
        assert!(GeoPoint::new(40.77, -73.97).is_valid());
        assert!(!GeoPoint::new(91.0, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, -180.5).is_valid());
    }

    #[test]
    fn test_timestamp_datetime_conversion() {
        let dt = Utc
            .with_ymd_and_hms(2024, 6, 15, 10, 30, 0)
            .unwrap()
            .checked_add_signed(chrono::Duration::nanoseconds(123_456_789))
            .unwrap();
        let ts = Timestamp::from(dt);
        assert_eq!(ts.seconds, dt.timestamp());
        assert_eq!(ts.nanoseconds, 123_456_789);
        assert_eq!(ts.to_datetime(), Some(dt));
    }

    #[test]
    fn test_timestamp_out_of_range() {
        let ts = Timestamp::new(i64::MAX, 0);
        assert_eq!(ts.to_datetime(), None);
    }

    #[test]
    fn test_field_value_kind() {
        assert_eq!(FieldValue::ServerTimestamp.kind(), "serverTimestamp");
        assert_eq!(FieldValue::Increment(2.0).kind(), "increment");
        assert_eq!(
            FieldValue::ArrayUnion(vec![Value::Int(1)]).kind(),
            "arrayUnion"
        );
    }
}
