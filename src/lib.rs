//! Client for the remote Configuration API.
//!
//! Typed proxies over the Configuration, Application, and Heartbeat endpoints,
//! authenticated with a client certificate, plus a two-tier cache with
//! single-flight population over the configuration read path.
//!
//! ```text
//!   startup ──▶ client (mTLS) ──▶ remote API
//!                  ▲
//!   values ──▶ cache (L1 local → L2 distributed → source)
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod security;
pub mod values;

pub use cache::{CacheOptions, ConfigurationCache};
pub use client::{ApiClient, ApiResponse, ClientError};
pub use config::ClientSettings;
pub use lifecycle::{bootstrap, Bootstrap};
pub use values::ConfigurationValues;
