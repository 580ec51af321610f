//! Distributed (shared) cache tier.
//!
//! # Responsibilities
//! - Define the byte-level contract for an external cache backend
//! - Provide the in-memory, process-local default backend
//!
//! # Design Decisions
//! - Values cross this boundary serialized, so any backend can store them
//! - Every operation is async: real backends live across the network

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use thiserror::Error;

use crate::client::Configuration;

/// Errors raised by a distributed cache backend.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The backend could not be reached or refused the operation.
    #[error("Cache backend unavailable: {0}")]
    Unavailable(String),

    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// An external cache tier shared by every process pointed at the same backing store.
#[async_trait]
pub trait DistributedCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError>;

    async fn remove(&self, key: &str) -> Result<(), CacheError>;
}

/// Serialize a configuration list into the bytes stored in a distributed tier.
pub fn encode(configurations: &[Configuration]) -> Result<Vec<u8>, CacheError> {
    Ok(serde_json::to_vec(configurations)?)
}

/// Inverse of [`encode`].
pub fn decode(bytes: &[u8]) -> Result<Vec<Configuration>, CacheError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Local-only backend: the single-process default.
#[derive(Debug, Clone, Default)]
pub struct MemoryDistributedCache {
    entries: Arc<DashMap<String, (Vec<u8>, Instant)>>,
}

impl MemoryDistributedCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl DistributedCache for MemoryDistributedCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let now = Instant::now();
        if let Some(entry) = self.entries.get(key) {
            if entry.1 > now {
                return Ok(Some(entry.0.clone()));
            }
        }
        self.entries.remove_if(key, |_, entry| entry.1 <= now);
        Ok(None)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError> {
        self.entries
            .insert(key.to_string(), (value, Instant::now() + ttl));
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.entries.remove(key);
        Ok(())
    }
}
