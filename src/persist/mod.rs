//! Persistence Module
//!
//! On-disk mirror of a cache and the cipher protecting it at rest.

mod cipher;
mod disk;

pub use cipher::{Cipher, CipherError, KEY_SIZES, NONCE_SIZE};
pub use disk::DiskStore;
