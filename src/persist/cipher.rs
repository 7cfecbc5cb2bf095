//! Cipher Module
//!
//! AES-GCM sealing of persisted bytes. Each sealed payload is laid out as
//! `nonce || ciphertext || tag` with a fresh random 96-bit nonce.

use aes_gcm::aead::consts::U12;
use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::aes::Aes192;
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm, Nonce};
use thiserror::Error;

type Aes192Gcm = AesGcm<Aes192, U12>;

/// Size of the nonce prefix in bytes.
pub const NONCE_SIZE: usize = 12;

/// Accepted key lengths in bytes (AES-128, AES-192, AES-256).
pub const KEY_SIZES: [usize; 3] = [16, 24, 32];

// == Cipher Error ==
/// Failures of the encryption layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CipherError {
    /// Key is not 16, 24 or 32 bytes long
    #[error("Invalid encryption key length: {0} bytes (expected 16, 24 or 32)")]
    InvalidKeyLength(usize),

    /// Input cannot even hold a nonce
    #[error("Ciphertext too short: {len} bytes")]
    CiphertextTooShort { len: usize },

    /// Tag mismatch: tampered data or wrong key
    #[error("Authentication failed: data is corrupt or the key is wrong")]
    Authentication,

    /// Encryption itself failed
    #[error("Encryption failed")]
    Encryption,
}

// == Cipher ==
/// AES-GCM with the key size picked from the key length.
pub enum Cipher {
    Aes128(Box<Aes128Gcm>),
    Aes192(Box<Aes192Gcm>),
    Aes256(Box<Aes256Gcm>),
}

impl Cipher {
    // == Constructor ==
    /// Builds a cipher for `key`.
    ///
    /// # Errors
    /// `CipherError::InvalidKeyLength` unless the key is 16, 24 or 32 bytes.
    pub fn new(key: &[u8]) -> Result<Self, CipherError> {
        let invalid = |_| CipherError::InvalidKeyLength(key.len());
        match key.len() {
            16 => Ok(Cipher::Aes128(Box::new(
                Aes128Gcm::new_from_slice(key).map_err(invalid)?,
            ))),
            24 => Ok(Cipher::Aes192(Box::new(
                Aes192Gcm::new_from_slice(key).map_err(invalid)?,
            ))),
            32 => Ok(Cipher::Aes256(Box::new(
                Aes256Gcm::new_from_slice(key).map_err(invalid)?,
            ))),
            len => Err(CipherError::InvalidKeyLength(len)),
        }
    }

    // == Seal ==
    /// Encrypts `plaintext` under a fresh nonce, returning `nonce || ciphertext`.
    pub fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>, CipherError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = match self {
            Cipher::Aes128(aead) => aead.encrypt(&nonce, plaintext),
            Cipher::Aes192(aead) => aead.encrypt(&nonce, plaintext),
            Cipher::Aes256(aead) => aead.encrypt(&nonce, plaintext),
        }
        .map_err(|_| CipherError::Encryption)?;

        let mut sealed = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);
        Ok(sealed)
    }

    // == Open ==
    /// Splits the nonce prefix off `sealed` and decrypts the remainder.
    pub fn open(&self, sealed: &[u8]) -> Result<Vec<u8>, CipherError> {
        if sealed.len() < NONCE_SIZE {
            return Err(CipherError::CiphertextTooShort { len: sealed.len() });
        }
        let (nonce, ciphertext) = sealed.split_at(NONCE_SIZE);
        let nonce = Nonce::<U12>::from_slice(nonce);

        let plaintext = match self {
            Cipher::Aes128(aead) => aead.decrypt(nonce, ciphertext),
            Cipher::Aes192(aead) => aead.decrypt(nonce, ciphertext),
            Cipher::Aes256(aead) => aead.decrypt(nonce, ciphertext),
        };
        plaintext.map_err(|_| CipherError::Authentication)
    }
}

impl std::fmt::Debug for Cipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bits = match self {
            Cipher::Aes128(_) => 128,
            Cipher::Aes192(_) => 192,
            Cipher::Aes256(_) => 256,
        };
        f.debug_struct("Cipher").field("bits", &bits).finish()
    }
}
