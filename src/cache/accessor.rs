//! Cache-aside access to an application's configuration list.
//!
//! # Responsibilities
//! - Serve reads from the local tier, then the distributed tier, then the source
//! - Collapse concurrent misses for one key into a single source fetch
//! - Invalidate both tiers and repopulate on demand
//!
//! # Design Decisions
//! - In-flight fetches are `Shared` futures tracked by weak handle, so a fetch lives
//!   exactly as long as someone is waiting on it
//! - A fetch deregisters itself before its result becomes visible; the next miss
//!   after a failure starts fresh
//! - Dropping every waiter cancels the fetch before it writes any tier
//! - Distributed tier failures degrade to the next step and are logged, never raised

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures_util::future::{BoxFuture, FutureExt, Shared, WeakShared};

use crate::cache::distributed::{self, DistributedCache, MemoryDistributedCache};
use crate::cache::key::cache_key;
use crate::cache::local::LocalTier;
use crate::cache::source::ConfigurationSource;
use crate::client::{ClientResult, Configuration};
use crate::config::schema::{CacheSettings, DEFAULT_CACHE_PREFIX};
use crate::observability::metrics;

type FetchResult = ClientResult<Arc<Vec<Configuration>>>;
type FetchFuture = BoxFuture<'static, FetchResult>;

/// Expiration and naming for cached configuration lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheOptions {
    /// Key namespace prefix.
    pub prefix: String,
    /// Lifetime of an entry in the distributed tier.
    pub expiration: Duration,
    /// Lifetime in the local tier; never longer than `expiration`.
    pub local_expiration: Option<Duration>,
}

impl CacheOptions {
    pub fn new(expiration: Duration) -> Self {
        Self {
            prefix: DEFAULT_CACHE_PREFIX.to_string(),
            expiration,
            local_expiration: None,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_local_expiration(mut self, local_expiration: Duration) -> Self {
        self.local_expiration = Some(local_expiration);
        self
    }

    /// Build options from settings; `None` when no expiration is configured.
    pub fn from_settings(settings: &CacheSettings) -> Option<Self> {
        let expiration = settings.expiration?.into();
        Some(Self {
            prefix: settings.prefix.clone(),
            expiration,
            local_expiration: settings.local_expiration.map(Into::into),
        })
    }

    fn local_ttl(&self) -> Duration {
        self.local_expiration
            .map_or(self.expiration, |local| local.min(self.expiration))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchMode {
    /// Check both tiers before going to the source.
    Read,
    /// Evict both tiers and go straight to the source.
    Refresh,
}

struct InFlight {
    id: u64,
    handle: WeakShared<FetchFuture>,
}

struct Inner {
    source: Arc<dyn ConfigurationSource>,
    local: LocalTier,
    distributed: Arc<dyn DistributedCache>,
    options: CacheOptions,
    in_flight: DashMap<String, InFlight>,
    next_id: AtomicU64,
}

/// Removes a fetch's in-flight registration when the fetch completes or is dropped.
struct Registration {
    inner: Arc<Inner>,
    key: String,
    id: u64,
}

impl Drop for Registration {
    fn drop(&mut self) {
        let id = self.id;
        self.inner
            .in_flight
            .remove_if(&self.key, |_, entry| entry.id == id);
    }
}

/// Two-tier cache-aside accessor over a [`ConfigurationSource`].
///
/// Cheap to clone; clones share tiers and in-flight state.
#[derive(Clone)]
pub struct ConfigurationCache {
    inner: Arc<Inner>,
}

impl ConfigurationCache {
    /// Create a cache with the in-memory distributed tier (single-process default).
    pub fn new(source: Arc<dyn ConfigurationSource>, options: CacheOptions) -> Self {
        Self::with_distributed(source, Arc::new(MemoryDistributedCache::new()), options)
    }

    /// Create a cache backed by an explicit distributed tier.
    pub fn with_distributed(
        source: Arc<dyn ConfigurationSource>,
        distributed: Arc<dyn DistributedCache>,
        options: CacheOptions,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                local: LocalTier::new(),
                distributed,
                options,
                in_flight: DashMap::new(),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    pub fn options(&self) -> &CacheOptions {
        &self.inner.options
    }

    /// Cache key for `application_name` under this cache's prefix.
    pub fn key_for(&self, application_name: &str) -> String {
        cache_key(&self.inner.options.prefix, application_name)
    }

    /// Get the configuration list for an application, populating the cache on a miss.
    pub async fn get_configurations_for_application(&self, application_name: &str) -> FetchResult {
        let key = self.key_for(application_name);
        if let Some(hit) = self.inner.local.get(&key) {
            metrics::record_cache_hit("local");
            return Ok(hit);
        }

        let fetch = self.join_or_start(&key, application_name);
        fetch.await
    }

    /// Evict the entry from both tiers, refetch, repopulate, and return the fresh list.
    ///
    /// A fetch already in flight for the key is allowed to finish first, so it can
    /// never write its older result after this one.
    pub async fn invalidate(&self, application_name: &str) -> FetchResult {
        let key = self.key_for(application_name);
        metrics::record_invalidation();
        tracing::debug!(key = %key, "Invalidating cached configurations");

        loop {
            let pending = match self.inner.in_flight.entry(key.clone()) {
                Entry::Occupied(mut entry) => {
                    let live = entry.get().handle.upgrade();
                    match live {
                        Some(pending) => Err(pending),
                        None => {
                            let (in_flight, fetch) = self.start(&key, application_name, FetchMode::Refresh);
                            if let Some(in_flight) = in_flight {
                                entry.insert(in_flight);
                            }
                            Ok(fetch)
                        }
                    }
                }
                Entry::Vacant(entry) => {
                    let (in_flight, fetch) = self.start(&key, application_name, FetchMode::Refresh);
                    if let Some(in_flight) = in_flight {
                        entry.insert(in_flight);
                    }
                    Ok(fetch)
                }
            };

            match pending {
                Ok(refresh) => return refresh.await,
                Err(previous) => {
                    // Outcome is irrelevant; only its completion matters.
                    let _ = previous.await;
                }
            }
        }
    }

    /// Local-tier lookup that never populates.
    pub fn peek(&self, application_name: &str) -> Option<Arc<Vec<Configuration>>> {
        self.inner.local.get(&self.key_for(application_name))
    }

    /// Number of fetches currently registered as in flight.
    pub fn in_flight_count(&self) -> usize {
        self.inner.in_flight.len()
    }

    fn join_or_start(&self, key: &str, application_name: &str) -> Shared<FetchFuture> {
        match self.inner.in_flight.entry(key.to_string()) {
            Entry::Occupied(mut entry) => {
                let live = entry.get().handle.upgrade();
                match live {
                    Some(fetch) => fetch,
                    None => {
                        let (in_flight, fetch) = self.start(key, application_name, FetchMode::Read);
                        if let Some(in_flight) = in_flight {
                            entry.insert(in_flight);
                        }
                        fetch
                    }
                }
            }
            Entry::Vacant(entry) => {
                let (in_flight, fetch) = self.start(key, application_name, FetchMode::Read);
                if let Some(in_flight) = in_flight {
                    entry.insert(in_flight);
                }
                fetch
            }
        }
    }

    fn start(
        &self,
        key: &str,
        application_name: &str,
        mode: FetchMode,
    ) -> (Option<InFlight>, Shared<FetchFuture>) {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let registration = Registration {
            inner: Arc::clone(&self.inner),
            key: key.to_string(),
            id,
        };
        let inner = Arc::clone(&self.inner);
        let key = key.to_string();
        let application_name = application_name.to_string();

        let fetch: FetchFuture = async move {
            let _registration = registration;
            inner.populate(&key, &application_name, mode).await
        }
        .boxed();
        let fetch = fetch.shared();

        // Only a completed `Shared` has no weak handle, and this one has not been polled.
        let in_flight = fetch.downgrade().map(|handle| InFlight { id, handle });
        (in_flight, fetch)
    }
}

impl Inner {
    async fn populate(&self, key: &str, application_name: &str, mode: FetchMode) -> FetchResult {
        match mode {
            FetchMode::Read => {
                // A fetch that finished between the caller's check and ours already filled L1.
                if let Some(hit) = self.local.get(key) {
                    metrics::record_cache_hit("local");
                    return Ok(hit);
                }
                if let Some(hit) = self.read_distributed(key).await {
                    metrics::record_cache_hit("distributed");
                    self.local.insert(key.to_string(), Arc::clone(&hit), self.options.local_ttl());
                    return Ok(hit);
                }
                metrics::record_cache_miss();
            }
            FetchMode::Refresh => {
                self.local.remove(key);
                if let Err(e) = self.distributed.remove(key).await {
                    tracing::warn!(key = %key, error = %e, "Failed to evict distributed cache entry");
                }
            }
        }

        let fetched = self.source.fetch_configurations(application_name).await;
        metrics::record_source_fetch(fetched.is_ok());
        let configurations = match fetched {
            Ok(list) => Arc::new(list),
            Err(e) => {
                tracing::warn!(
                    application = %application_name,
                    error = %e,
                    "Failed to fetch configurations; nothing cached"
                );
                return Err(e);
            }
        };

        self.write_distributed(key, &configurations).await;
        self.local
            .insert(key.to_string(), Arc::clone(&configurations), self.options.local_ttl());

        tracing::debug!(
            application = %application_name,
            count = configurations.len(),
            "Cached configurations"
        );
        Ok(configurations)
    }

    async fn read_distributed(&self, key: &str) -> Option<Arc<Vec<Configuration>>> {
        let bytes = match self.distributed.get(key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Distributed cache read failed");
                return None;
            }
        };

        match distributed::decode(&bytes) {
            Ok(list) => Some(Arc::new(list)),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Discarding undecodable distributed cache entry");
                None
            }
        }
    }

    async fn write_distributed(&self, key: &str, configurations: &[Configuration]) {
        let bytes = match distributed::encode(configurations) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to serialize configurations");
                return;
            }
        };
        if let Err(e) = self
            .distributed
            .set(key, bytes, self.options.expiration)
            .await
        {
            tracing::warn!(key = %key, error = %e, "Distributed cache write failed");
        }
    }
}

impl std::fmt::Debug for ConfigurationCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigurationCache")
            .field("options", &self.inner.options)
            .field("in_flight", &self.inner.in_flight.len())
            .finish()
    }
}
