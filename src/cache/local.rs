//! Process-local cache tier.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::client::Configuration;

#[derive(Debug, Clone)]
struct LocalEntry {
    value: Arc<Vec<Configuration>>,
    expires_at: Instant,
}

/// In-process tier: a concurrent map with per-entry expiry.
///
/// Values are shared `Arc`s, so readers never observe a partially written list.
#[derive(Debug, Default)]
pub struct LocalTier {
    entries: DashMap<String, LocalEntry>,
}

impl LocalTier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a live entry; expired entries are dropped on access.
    pub fn get(&self, key: &str) -> Option<Arc<Vec<Configuration>>> {
        {
            let entry = self.entries.get(key)?;
            if entry.expires_at > Instant::now() {
                return Some(Arc::clone(&entry.value));
            }
        }
        self.entries
            .remove_if(key, |_, entry| entry.expires_at <= Instant::now());
        None
    }

    pub fn insert(&self, key: String, value: Arc<Vec<Configuration>>, ttl: Duration) {
        let expires_at = Instant::now() + ttl;
        self.entries.insert(key, LocalEntry { value, expires_at });
    }

    pub fn remove(&self, key: &str) {
        self.entries.remove(key);
    }

    /// Number of stored entries, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
