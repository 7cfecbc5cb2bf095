//! Cache Facade Module
//!
//! Composes the memory store, the disk mirror and the cipher into the
//! public cache operations.

use std::path::Path;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::stats::StatsCounters;
use crate::cache::{resolve_keys, CacheStats, Identity, MemoryStore, Record};
use crate::config::{user_cache_dir, CacheConfig};
use crate::error::{CacheError, Result};
use crate::persist::{Cipher, DiskStore};

// == Cache Option ==
/// Construction options for [`Cache::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheOption {
    /// No special behavior
    #[default]
    None,
    /// Mirror every entry to `<user cache dir>/<name>/`
    Persistent,
}

// == Cache ==
/// A typed cache with lazy expiration, optional disk persistence and
/// optional at-rest encryption.
///
/// All operations take `&self` and may be called from several threads at
/// once. Writes of one `set` to several keys, and the memory-then-disk
/// sequence of each key, are not atomic.
pub struct Cache<T> {
    name: String,
    items: MemoryStore<T>,
    default_expiration: Duration,
    persistent: bool,
    disk: DiskStore,
    encryption_key: Option<Vec<u8>>,
    stats: StatsCounters,
}

impl<T> Cache<T>
where
    T: Identity + Serialize + DeserializeOwned + Clone,
{
    // == Constructor ==
    /// Creates a cache named `name`.
    ///
    /// With [`CacheOption::Persistent`] the cache mirrors its entries to
    /// `<user cache dir>/<name>/`.
    pub fn new(name: impl Into<String>, options: &[CacheOption]) -> Self {
        let name = name.into();
        let persistent = options.contains(&CacheOption::Persistent);
        let disk = DiskStore::new(user_cache_dir().join(&name));

        Self {
            name,
            items: MemoryStore::new(),
            default_expiration: Duration::ZERO,
            persistent,
            disk,
            encryption_key: None,
            stats: StatsCounters::default(),
        }
    }

    /// Creates a cache from a loaded [`CacheConfig`].
    pub fn from_config(name: impl Into<String>, config: &CacheConfig) -> Self {
        let options: &[CacheOption] = if config.persistent {
            &[CacheOption::Persistent]
        } else {
            &[]
        };
        Self::new(name, options)
            .with_directory(&config.root)
            .with_expiration(config.default_expiration)
    }

    // == Configuration ==
    /// Sets the default expiration used by [`Cache::set`]. Zero means
    /// permanent. Records already stored keep their expiration.
    pub fn with_expiration(mut self, expiration: Duration) -> Self {
        self.default_expiration = expiration;
        self
    }

    /// Installs an encryption key for persisted records and turns
    /// persistence on.
    ///
    /// The key must be 16, 24 or 32 bytes; a bad key is reported by the
    /// first `set` or disk read rather than here.
    pub fn with_encryption_key(mut self, key: impl Into<Vec<u8>>) -> Self {
        self.encryption_key = Some(key.into());
        self.persistent = true;
        self
    }

    /// Uses `root` instead of the user cache directory. Files go to
    /// `<root>/<name>/`. Does not turn persistence on by itself.
    pub fn with_directory(mut self, root: impl AsRef<Path>) -> Self {
        self.disk = DiskStore::new(root.as_ref().join(&self.name));
        self
    }

    // == Accessors ==
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Backing directory, used only when the cache is persistent.
    pub fn directory(&self) -> &Path {
        self.disk.directory()
    }

    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    pub fn is_encrypted(&self) -> bool {
        self.encryption_key.is_some()
    }

    pub fn default_expiration(&self) -> Duration {
        self.default_expiration
    }

    /// Number of in-memory entries, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Snapshot of the lookup counters.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot()
    }

    // == Set ==
    /// Stores `item` with the default expiration.
    ///
    /// See [`Cache::set_with_expiration`].
    pub fn set(&self, item: T, keys: &[&str]) -> Result<()> {
        self.set_with_expiration(item, self.default_expiration, keys)
    }

    // == Set With Expiration ==
    /// Stores `item` under every key derived from `keys` and the item's
    /// [`Identity`], expiring `expiration` from now (zero = permanent).
    ///
    /// When persistent, each key is also written to disk, sealed if an
    /// encryption key is set. The write is best-effort: if one key fails,
    /// the error is returned and keys written before it are kept.
    ///
    /// # Errors
    /// - `ArgumentMissing` when no key can be derived
    /// - `Cipher(InvalidKeyLength)` before anything is stored
    /// - `Serialization` or `Io` from the disk mirror
    pub fn set_with_expiration(&self, item: T, expiration: Duration, keys: &[&str]) -> Result<()> {
        let keys = resolve_keys(&item, keys)?;
        let cipher = self.cipher()?;
        let record = Record::new(item, expiration);

        let encoded = if self.persistent {
            Some(serde_json::to_vec(&record)?)
        } else {
            None
        };

        for key in &keys {
            self.items.store(key, record.clone());
            if let Some(encoded) = &encoded {
                // Every file gets its own nonce.
                match &cipher {
                    Some(cipher) => self.disk.write(key, &cipher.seal(encoded)?)?,
                    None => self.disk.write(key, encoded)?,
                }
            }
        }

        debug!(
            cache = %self.name,
            keys = ?keys,
            expires_at = ?record.expires_at(),
            persistent = self.persistent,
            "Stored item"
        );
        Ok(())
    }

    // == Get ==
    /// Returns the live value stored under `key`.
    ///
    /// Memory is consulted first. Expired records are evicted from memory
    /// and disk unless a concurrent `set` has already replaced them. On a memory miss a persistent cache rehydrates from disk;
    /// a rehydrated record that has already expired is evicted instead of
    /// returned.
    ///
    /// # Errors
    /// - `NotFound` if there is no live record, or the persisted one cannot be decoded
    /// - `Cipher` if the persisted bytes fail authentication or the key is invalid
    /// - `Io` for disk failures other than a missing file
    pub fn get(&self, key: &str) -> Result<T> {
        if let Some(record) = self.items.load(key) {
            if record.is_expired() {
                self.evict(key);
                return Err(CacheError::not_found(key));
            }
            self.stats.record_hit();
            return Ok(record.item);
        }

        if !self.persistent {
            return Err(self.miss(key));
        }

        let Some(data) = self.disk.read(key)? else {
            return Err(self.miss(key));
        };
        let data = match self.cipher()? {
            Some(cipher) => cipher.open(&data)?,
            None => data,
        };
        let record: Record<T> = match serde_json::from_slice(&data) {
            Ok(record) => record,
            Err(e) => {
                warn!(cache = %self.name, key = %key, error = %e, "Failed to decode cache file");
                return Err(self.miss(key));
            }
        };

        if record.is_expired() {
            self.stats.record_expiration();
            self.stats.record_miss();
            self.disk.remove(key);
            debug!(cache = %self.name, key = %key, "Discarded expired cache file");
            return Err(CacheError::not_found(key));
        }

        self.items.store(key, record.clone());
        self.stats.record_rehydration();
        self.stats.record_hit();
        debug!(cache = %self.name, key = %key, "Rehydrated item from disk");
        Ok(record.item)
    }

    // == Clear ==
    /// Empties memory and, when persistent, deletes the backing directory.
    ///
    /// The in-memory part always succeeds; the error only reflects the
    /// directory removal.
    pub fn clear(&self) -> Result<()> {
        let removed = self.items.clear();
        debug!(cache = %self.name, removed, "Cleared memory");

        if self.persistent {
            self.disk.remove_all()?;
            debug!(cache = %self.name, directory = %self.disk.directory().display(), "Removed cache directory");
        }
        Ok(())
    }

    // == Helpers ==
    fn cipher(&self) -> Result<Option<Cipher>> {
        match &self.encryption_key {
            Some(key) => Ok(Some(Cipher::new(key)?)),
            None => Ok(None),
        }
    }

    /// Drops `key` from memory and disk if its record is still expired. A
    /// record replaced by a concurrent `set` is left alone.
    fn evict(&self, key: &str) {
        let evicted = self.items.delete_if_expired(key, || {
            if self.persistent {
                self.disk.remove(key);
            }
        });
        if evicted {
            self.stats.record_expiration();
            debug!(cache = %self.name, key = %key, "Evicted expired item");
        }
        self.stats.record_miss();
    }

    fn miss(&self, key: &str) -> CacheError {
        self.stats.record_miss();
        debug!(cache = %self.name, key = %key, "Cache miss");
        CacheError::not_found(key)
    }
}

impl<T> std::fmt::Debug for Cache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache")
            .field("name", &self.name)
            .field("entries", &self.items.len())
            .field("default_expiration", &self.default_expiration)
            .field("persistent", &self.persistent)
            .field("directory", &self.disk.directory())
            .field("encrypted", &self.encryption_key.is_some())
            .finish()
    }
}
