//! Client certificate loading and HTTP client construction.

use std::path::Path;
use std::time::Duration;

use reqwest::Identity;

use crate::client::error::{ClientError, ClientResult};
use crate::config::HttpSettings;

/// Load a PKCS#12 client identity from disk, unlocking it with `password`.
pub fn load_identity(path: &Path, password: &str) -> ClientResult<Identity> {
    if !path.exists() {
        return Err(ClientError::Certificate(format!(
            "Certificate file not found: {:?}",
            path
        )));
    }

    let der = std::fs::read(path).map_err(|e| {
        ClientError::Certificate(format!("Failed to read certificate {:?}: {}", path, e))
    })?;

    // Wrong passwords and corrupt archives both surface here.
    Identity::from_pkcs12_der(&der, password).map_err(|e| {
        ClientError::Certificate(format!("Failed to unlock certificate {:?}: {}", path, e))
    })
}

/// Build the long-lived `reqwest::Client` used for every API call.
///
/// Timeouts come from settings; this layer adds none of its own.
pub fn build_http_client(
    identity: Option<Identity>,
    settings: &HttpSettings,
) -> ClientResult<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .use_native_tls()
        .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
        .pool_idle_timeout(Duration::from_secs(settings.pool_idle_timeout_secs))
        .user_agent(concat!("config-client/", env!("CARGO_PKG_VERSION")));

    if let Some(secs) = settings.request_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    if let Some(identity) = identity {
        builder = builder.identity(identity);
    }

    builder
        .build()
        .map_err(|e| ClientError::Certificate(format!("Failed to build HTTP client: {}", e)))
}
