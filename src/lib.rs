//! Typed Cache - An embeddable cache for typed values
//!
//! Stores values in memory with optional expiration, mirrors them to disk
//! when persistent, and encrypts the disk copy when given a key.
//!
//! # Example
//! ```no_run
//! use std::time::Duration;
//!
//! use serde::{Deserialize, Serialize};
//! use typed_cache::{Cache, CacheOption, Identity};
//!
//! #[derive(Clone, Serialize, Deserialize)]
//! struct User {
//!     id: String,
//!     name: String,
//! }
//!
//! impl Identity for User {
//!     fn string_id(&self) -> Option<String> {
//!         Some(self.id.clone())
//!     }
//! }
//!
//! let cache = Cache::new("users", &[CacheOption::Persistent])
//!     .with_expiration(Duration::from_secs(60))
//!     .with_encryption_key(b"0123456789abcdef".to_vec());
//!
//! cache.set(User { id: "u1".into(), name: "Joe".into() }, &[])?;
//! let user = cache.get("u1")?;
//! assert_eq!(user.name, "Joe");
//! # Ok::<(), typed_cache::CacheError>(())
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod persist;

pub use cache::{Cache, CacheOption, CacheStats, Identity, Record};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
