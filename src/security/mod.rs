//! Security subsystem.
//!
//! # Responsibilities
//! - Decrypt the stored client-certificate password
//! - Provide the matching encryption helper for operators
//!
//! # Design Decisions
//! - AES-256-GCM with a random per-value nonce
//! - Key material from the environment, never from the settings file

pub mod secrets;

pub use secrets::{SecretCipher, SecretError, ENCRYPTION_KEY_ENV_VAR};
