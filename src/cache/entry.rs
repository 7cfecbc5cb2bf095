//! Record Module
//!
//! Defines the envelope stored for every key: a value plus its absolute
//! expiration instant.

use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};

// == Record ==
/// A cached value together with its expiration.
///
/// The serialized form is the on-disk envelope:
/// `{"Item": <value>, "Expiration": <unix nanos>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<T> {
    /// The stored value
    #[serde(rename = "Item")]
    pub item: T,
    /// Expiration timestamp (Unix nanoseconds), 0 = never expires
    #[serde(rename = "Expiration", default)]
    pub expiration: u64,
}

impl<T> Record<T> {
    // == Constructor ==
    /// Creates a new record expiring `expiration` from now.
    ///
    /// A zero duration makes the record permanent.
    pub fn new(item: T, expiration: Duration) -> Self {
        let expiration = if expiration.is_zero() {
            0
        } else {
            let ttl = u64::try_from(expiration.as_nanos()).unwrap_or(u64::MAX);
            current_timestamp_ns().saturating_add(ttl)
        };

        Self { item, expiration }
    }

    /// Creates a record that never expires.
    pub fn permanent(item: T) -> Self {
        Self {
            item,
            expiration: 0,
        }
    }

    // == Expires At ==
    /// Returns the expiration instant, or None for a permanent record.
    pub fn expires_at(&self) -> Option<u64> {
        (self.expiration > 0).then_some(self.expiration)
    }

    // == Is Expired ==
    /// Checks if the record has expired.
    ///
    /// A record is expired once the current time is strictly past its
    /// expiration instant. Permanent records never expire.
    pub fn is_expired(&self) -> bool {
        match self.expires_at() {
            Some(expires) => current_timestamp_ns() > expires,
            None => false,
        }
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in nanoseconds.
pub fn current_timestamp_ns() -> u64 {
    Utc::now()
        .timestamp_nanos_opt()
        .and_then(|ns| u64::try_from(ns).ok())
        .unwrap_or(0)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_record_creation_no_expiration() {
        let record = Record::new("test_value".to_string(), Duration::ZERO);

        assert_eq!(record.item, "test_value");
        assert_eq!(record.expiration, 0);
        assert!(record.expires_at().is_none());
        assert!(!record.is_expired());
    }

    #[test]
    fn test_record_creation_with_expiration() {
        let before = current_timestamp_ns();
        let record = Record::new("test_value".to_string(), Duration::from_secs(60));

        let expires = record.expires_at().unwrap();
        assert!(expires >= before + 60_000_000_000);
        assert!(!record.is_expired());
    }

    #[test]
    fn test_record_expiration() {
        let record = Record::new("test_value".to_string(), Duration::from_millis(50));

        assert!(!record.is_expired());

        sleep(Duration::from_millis(100));

        assert!(record.is_expired());
    }

    #[test]
    fn test_past_expiration_is_expired() {
        let record = Record {
            item: "test".to_string(),
            expiration: 1,
        };

        assert!(record.is_expired());
        assert_eq!(record.expires_at(), Some(1));
    }

    #[test]
    fn test_huge_expiration_saturates() {
        let record = Record::new("test".to_string(), Duration::MAX);

        assert_eq!(record.expiration, u64::MAX);
        assert!(!record.is_expired());
    }

    #[test]
    fn test_envelope_format() {
        let record = Record {
            item: 42u32,
            expiration: 7,
        };

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"Item":42,"Expiration":7}"#);

        let decoded: Record<u32> = serde_json::from_str(r#"{"Item":42}"#).unwrap();
        assert_eq!(decoded, Record::permanent(42));
    }
}
