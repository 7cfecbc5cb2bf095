//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::persist::CipherError;

// == Cache Error Enum ==
/// Unified error type for cache operations.
#[derive(Error, Debug)]
pub enum CacheError {
    /// A required argument was not supplied (e.g. no key could be derived)
    #[error("Missing argument: {0}")]
    ArgumentMissing(&'static str),

    /// No live record exists for the key
    #[error("Key not found: {key}")]
    NotFound { key: String },

    /// Filesystem failure other than a missing file
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Envelope could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Encryption or decryption of persisted bytes failed
    #[error("Cipher error: {0}")]
    Cipher(#[from] CipherError),
}

impl CacheError {
    pub(crate) fn not_found(key: &str) -> Self {
        CacheError::NotFound {
            key: key.to_string(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        CacheError::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns true when the error means "no live record".
    pub fn is_not_found(&self) -> bool {
        matches!(self, CacheError::NotFound { .. })
    }

    /// The key a `NotFound` error refers to.
    pub fn key(&self) -> Option<&str> {
        match self {
            CacheError::NotFound { key } => Some(key),
            _ => None,
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_carries_key() {
        let err = CacheError::not_found("u1");
        assert!(err.is_not_found());
        assert_eq!(err.key(), Some("u1"));
        assert_eq!(err.to_string(), "Key not found: u1");
    }

    #[test]
    fn test_other_errors_have_no_key() {
        let err = CacheError::ArgumentMissing("key");
        assert!(!err.is_not_found());
        assert_eq!(err.key(), None);
        assert_eq!(err.to_string(), "Missing argument: key");
    }

    #[test]
    fn test_io_error_mentions_path() {
        let err = CacheError::io(
            "/tmp/somewhere",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("/tmp/somewhere"));
    }

    #[test]
    fn test_cipher_error_converts() {
        let err: CacheError = CipherError::Authentication.into();
        assert!(matches!(err, CacheError::Cipher(CipherError::Authentication)));
    }
}
