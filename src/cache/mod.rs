//! Cache Module
//!
//! Provides the typed in-memory cache with lazy expiration and the facade
//! tying it to the disk mirror.

mod entry;
mod facade;
mod identity;
mod stats;
mod store;


// Re-export public types
pub use entry::{current_timestamp_ns, Record};
pub use facade::{Cache, CacheOption};
pub use identity::{resolve_keys, Identity};
pub use stats::CacheStats;
pub use store::MemoryStore;
