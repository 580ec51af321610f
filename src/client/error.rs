//! Client error definitions.

use std::sync::Arc;
use thiserror::Error;

/// Errors raised by the remote client and the layers that unwrap its responses.
///
/// Cloneable so a single shared fetch can hand the same failure to every waiter.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// Client certificate could not be read or unlocked.
    #[error("Certificate error: {0}")]
    Certificate(String),

    /// Base URL or request path could not be formed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Connection, TLS handshake, or transport timeout failure.
    #[error("Transport error: {0}")]
    Transport(Arc<reqwest::Error>),

    /// A successful response carried a body that did not match the expected shape.
    #[error("Failed to decode response body: {0}")]
    Decode(String),

    /// The remote API answered with a non-success status.
    #[error("Remote API returned {status} {reason}: {body}")]
    Api {
        status: u16,
        reason: String,
        body: String,
    },
}

impl ClientError {
    /// True for failures the remote API reported, as opposed to local or network ones.
    pub fn is_remote(&self) -> bool {
        matches!(self, ClientError::Api { .. })
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Transport(Arc::new(e))
    }
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
