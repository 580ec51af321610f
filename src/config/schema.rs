//! Settings schema definitions.
//!
//! This module defines the complete settings structure for the client.
//! All types derive Serde traits for deserialization from settings files.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::values::TimeSpan;

/// Default namespace prefix for cache keys.
pub const DEFAULT_CACHE_PREFIX: &str = "ConfigurationClient";

/// Root settings for the configuration client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientSettings {
    /// Deployment instance identifier (e.g., "Acme").
    pub instance: String,

    /// Environment identifier (e.g., "Production").
    pub environment: String,

    /// Application whose configuration is loaded at startup.
    pub application_name: String,

    /// Endpoint settings keyed by `"{instance}.{environment}"`.
    pub environments: HashMap<String, EndpointSettings>,

    /// Cache settings.
    pub cache: CacheSettings,

    /// HTTP transport settings.
    pub http: HttpSettings,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl ClientSettings {
    /// Composite key scoping endpoint settings to this instance and environment.
    pub fn scope(&self) -> String {
        format!("{}.{}", self.instance, self.environment)
    }

    /// Endpoint settings for the configured instance and environment.
    pub fn endpoint(&self) -> Option<&EndpointSettings> {
        self.environments.get(&self.scope())
    }
}

/// Remote API endpoint and credentials for one instance/environment pair.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EndpointSettings {
    /// API base URL (e.g., "https://config.example.com").
    pub base_url: String,

    /// Path to the PKCS#12 client certificate.
    pub certificate_path: PathBuf,

    /// Certificate password, AES-256-GCM encrypted and base64 encoded.
    pub certificate_password: String,
}

/// Cache settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Namespace prefix for cache keys.
    pub prefix: String,

    /// Entry lifetime. Required; there is no implicit default.
    pub expiration: Option<TimeSpan>,

    /// Optional shorter lifetime for the process-local tier.
    pub local_expiration: Option<TimeSpan>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_CACHE_PREFIX.to_string(),
            expiration: None,
            local_expiration: None,
        }
    }
}

/// HTTP transport settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Total request timeout in seconds (none when unset).
    pub request_timeout_secs: Option<u64>,

    /// Idle pooled connection lifetime in seconds.
    pub pool_idle_timeout_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            request_timeout_secs: None,
            pool_idle_timeout_secs: 90,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
