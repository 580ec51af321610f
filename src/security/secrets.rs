//! Encrypted-at-rest secrets.
//!
//! # Security
//! - The encryption key is loaded ONLY from an environment variable
//! - Decrypted values are never logged
//! - Stored form: base64(nonce[12] || AES-256-GCM ciphertext)

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rand::RngCore;
use thiserror::Error;

/// Environment variable holding the base64-encoded 32-byte key.
pub const ENCRYPTION_KEY_ENV_VAR: &str = "CONFIG_CLIENT_ENCRYPTION_KEY";

/// Nonce size for AES-256-GCM (96 bits).
const NONCE_SIZE: usize = 12;

/// Key size for AES-256 (256 bits).
const KEY_SIZE: usize = 32;

/// Errors raised while handling encrypted secrets.
#[derive(Debug, Error)]
pub enum SecretError {
    #[error("Environment variable {0} not set")]
    MissingKey(&'static str),

    #[error("Invalid encryption key: {0}")]
    InvalidKey(String),

    #[error("Invalid encrypted value: {0}")]
    Malformed(String),

    /// Wrong key or tampered ciphertext.
    #[error("Decryption failed")]
    Decrypt,

    #[error("Encryption failed")]
    Encrypt,
}

/// AES-256-GCM cipher for stored secrets.
pub struct SecretCipher {
    cipher: Aes256Gcm,
}

impl SecretCipher {
    /// Create a cipher from raw key bytes.
    pub fn new(key: &[u8; KEY_SIZE]) -> Self {
        Self {
            cipher: Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key)),
        }
    }

    /// Create a cipher from a base64-encoded key.
    pub fn from_base64_key(encoded: &str) -> Result<Self, SecretError> {
        let bytes = BASE64
            .decode(encoded.trim())
            .map_err(|e| SecretError::InvalidKey(e.to_string()))?;
        let key: [u8; KEY_SIZE] = bytes.try_into().map_err(|b: Vec<u8>| {
            SecretError::InvalidKey(format!("expected {} bytes, got {}", KEY_SIZE, b.len()))
        })?;
        Ok(Self::new(&key))
    }

    /// Load the key from `CONFIG_CLIENT_ENCRYPTION_KEY`.
    pub fn from_env() -> Result<Self, SecretError> {
        let encoded = std::env::var(ENCRYPTION_KEY_ENV_VAR)
            .map_err(|_| SecretError::MissingKey(ENCRYPTION_KEY_ENV_VAR))?;
        Self::from_base64_key(&encoded)
    }

    /// Generate a fresh random key, base64 encoded.
    pub fn generate_key() -> String {
        let mut key = [0u8; KEY_SIZE];
        rand::thread_rng().fill_bytes(&mut key);
        BASE64.encode(key)
    }

    /// Encrypt `plaintext` into its stored form.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, SecretError> {
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), plaintext.as_bytes())
            .map_err(|_| SecretError::Encrypt)?;

        let mut stored = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        stored.extend_from_slice(&nonce_bytes);
        stored.extend_from_slice(&ciphertext);
        Ok(BASE64.encode(stored))
    }

    /// Decrypt a stored value back to plaintext.
    pub fn decrypt(&self, stored: &str) -> Result<String, SecretError> {
        let bytes = BASE64
            .decode(stored.trim())
            .map_err(|e| SecretError::Malformed(e.to_string()))?;
        if bytes.len() <= NONCE_SIZE {
            return Err(SecretError::Malformed("value too short".to_string()));
        }

        let (nonce, ciphertext) = bytes.split_at(NONCE_SIZE);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| SecretError::Decrypt)?;

        String::from_utf8(plaintext).map_err(|e| SecretError::Malformed(e.to_string()))
    }
}

impl std::fmt::Debug for SecretCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretCipher { .. }")
    }
}
