//! Configuration Module
//!
//! Handles loading cache configuration from environment variables and
//! resolving the per-user cache root.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheConfig {
    /// Root directory under which each persistent cache gets `<root>/<name>/`
    pub root: PathBuf,
    /// Default expiration applied by `Cache::set`, zero = permanent
    pub default_expiration: Duration,
    /// Whether caches built from this config mirror their entries to disk
    pub persistent: bool,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_ROOT` - Root directory for persisted caches (default: user cache dir)
    /// - `CACHE_DEFAULT_EXPIRATION_MS` - Default expiration in milliseconds (default: 0)
    /// - `CACHE_PERSISTENT` - `true` or `1` to enable persistence (default: false)
    pub fn from_env() -> Self {
        Self {
            root: env::var_os("CACHE_ROOT")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(user_cache_dir),
            default_expiration: env::var("CACHE_DEFAULT_EXPIRATION_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(Duration::ZERO),
            persistent: env::var("CACHE_PERSISTENT")
                .ok()
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            root: user_cache_dir(),
            default_expiration: Duration::ZERO,
            persistent: false,
        }
    }
}

/// Returns the per-user cache root for this platform.
///
/// Falls back to the system temp directory when no home can be found.
pub fn user_cache_dir() -> PathBuf {
    platform_cache_dir().unwrap_or_else(env::temp_dir)
}

#[cfg(target_os = "macos")]
fn platform_cache_dir() -> Option<PathBuf> {
    env::var_os("HOME").map(|home| PathBuf::from(home).join("Library").join("Caches"))
}

#[cfg(windows)]
fn platform_cache_dir() -> Option<PathBuf> {
    env::var_os("LOCALAPPDATA").map(PathBuf::from)
}

#[cfg(not(any(target_os = "macos", windows)))]
fn platform_cache_dir() -> Option<PathBuf> {
    env::var_os("XDG_CACHE_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(".cache")))
}
