//! Two-tier configuration cache.
//!
//! # Data Flow
//! ```text
//! get_configurations_for_application(name)
//!     → key.rs ("{prefix}.Configurations.{name}")
//!     → local.rs (L1, in-process) ── hit ──▶ return
//!     → in-flight map (join a running fetch for the key, or start one)
//!         → distributed.rs (L2, shared) ── hit ──▶ warm L1, return
//!         → source.rs (remote API) ──▶ write L2, write L1, return
//! ```
//!
//! # Design Decisions
//! - At most one source fetch per key per process at a time
//! - Invalidation clears both tiers so neither resurrects stale data
//! - Errors are never cached

pub mod accessor;
pub mod distributed;
pub mod key;
pub mod local;
pub mod source;

pub use accessor::{CacheOptions, ConfigurationCache};
pub use distributed::{CacheError, DistributedCache, MemoryDistributedCache};
pub use key::cache_key;
pub use source::ConfigurationSource;
