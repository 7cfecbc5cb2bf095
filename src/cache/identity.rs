//! Identity Module
//!
//! Derives the keys a value is stored under, from explicit keys and from
//! the identity capabilities the value exposes.

use uuid::Uuid;

use crate::error::{CacheError, Result};

// == Identity ==
/// Optional identity capabilities of a cached value.
///
/// Each capability defaults to `None`. A type implements only the ones it
/// has; every capability that returns a value contributes one key.
///
/// ```
/// use typed_cache::Identity;
/// use uuid::Uuid;
///
/// #[derive(Clone)]
/// struct User {
///     id: Uuid,
///     name: String,
/// }
///
/// impl Identity for User {
///     fn unique_id(&self) -> Option<Uuid> {
///         Some(self.id)
///     }
/// }
/// ```
pub trait Identity {
    /// A globally unique identifier.
    fn unique_id(&self) -> Option<Uuid> {
        None
    }

    /// A string identifier.
    fn string_id(&self) -> Option<String> {
        None
    }

    /// A human readable name.
    fn name(&self) -> Option<String> {
        None
    }
}

/// Plain values carry no identity and must be stored under explicit keys.
macro_rules! anonymous {
    ($($ty:ty),* $(,)?) => {
        $(impl Identity for $ty {})*
    };
}

anonymous!(
    String, bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    serde_json::Value,
);

impl<T> Identity for Vec<T> {}

impl<T> Identity for Option<T> {}

// == Resolve Keys ==
/// Resolves every key `item` should be stored under.
///
/// Order: explicit keys as given, then the unique id, the string id and the
/// name when the item provides them.
///
/// # Errors
/// `CacheError::ArgumentMissing` when no key can be derived at all.
pub fn resolve_keys<T>(item: &T, explicit: &[&str]) -> Result<Vec<String>>
where
    T: Identity + ?Sized,
{
    let mut keys: Vec<String> = explicit.iter().map(|k| k.to_string()).collect();

    if let Some(id) = item.unique_id() {
        keys.push(id.hyphenated().to_string());
    }
    if let Some(id) = item.string_id() {
        keys.push(id);
    }
    if let Some(name) = item.name() {
        keys.push(name);
    }

    if keys.is_empty() {
        return Err(CacheError::ArgumentMissing("key"));
    }
    Ok(keys)
}
