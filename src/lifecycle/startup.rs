//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate settings and resolve the environment-scoped endpoint
//! - Decrypt the certificate password and build the certificate client once
//! - Fetch the configured application's configuration a single time
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The initial load is returned as an explicit snapshot; no global state is mutated
//! - The snapshot is a one-time copy; runtime reads go through `ConfigurationValues`

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::cache::{CacheOptions, ConfigurationCache, ConfigurationSource, DistributedCache};
use crate::client::{ApiClient, ClientError, ConfigurationService};
use crate::config::{validate_settings, ClientSettings, SettingsError, ValidationError};
use crate::security::{SecretCipher, SecretError};
use crate::values::ConfigurationValues;

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("Certificate password: {0}")]
    Secret(#[from] SecretError),

    #[error("Initial configuration load failed: {0}")]
    Client(#[from] ClientError),
}

/// Key-value pairs loaded at startup, under their raw keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigurationSnapshot {
    values: HashMap<String, String>,
}

impl ConfigurationSnapshot {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_map(self) -> HashMap<String, String> {
        self.values
    }
}

impl FromIterator<(String, String)> for ConfigurationSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Everything produced by a successful startup.
#[derive(Debug, Clone)]
pub struct Bootstrap {
    /// Certificate-authenticated client, reused for the process lifetime.
    pub api: ApiClient,
    pub application_name: String,
    pub cache_options: CacheOptions,
    /// One-time copy of the application's configuration.
    pub snapshot: ConfigurationSnapshot,
}

impl Bootstrap {
    /// Build the runtime accessor with the in-memory distributed tier.
    pub fn into_values(self) -> ConfigurationValues {
        let source: Arc<dyn ConfigurationSource> = Arc::new(ConfigurationService::new(self.api));
        ConfigurationValues::new(ConfigurationCache::new(source, self.cache_options))
    }

    /// Build the runtime accessor over a shared distributed tier.
    pub fn into_values_with(self, distributed: Arc<dyn DistributedCache>) -> ConfigurationValues {
        let source: Arc<dyn ConfigurationSource> = Arc::new(ConfigurationService::new(self.api));
        ConfigurationValues::new(ConfigurationCache::with_distributed(
            source,
            distributed,
            self.cache_options,
        ))
    }
}

/// Run startup with the certificate password key taken from the environment.
pub async fn bootstrap(settings: &ClientSettings) -> Result<Bootstrap, StartupError> {
    validate_settings(settings).map_err(SettingsError::Validation)?;
    let cipher = SecretCipher::from_env()?;
    let api = connect(settings, &cipher)?;
    bootstrap_with_client(settings, api).await
}

/// Resolve the scoped endpoint and build the certificate-authenticated client.
pub fn connect(settings: &ClientSettings, cipher: &SecretCipher) -> Result<ApiClient, StartupError> {
    let endpoint = settings.endpoint().ok_or_else(|| {
        SettingsError::Validation(vec![ValidationError::new(
            format!("environments.\"{}\"", settings.scope()),
            "no endpoint configured for this instance and environment",
        )])
    })?;

    let password = cipher.decrypt(&endpoint.certificate_password)?;
    let api = ApiClient::with_certificate(
        &endpoint.base_url,
        &endpoint.certificate_path,
        &password,
        &settings.http,
    )?;
    Ok(api)
}

/// Run the initial load with an already-built client.
pub async fn bootstrap_with_client(
    settings: &ClientSettings,
    api: ApiClient,
) -> Result<Bootstrap, StartupError> {
    let cache_options = CacheOptions::from_settings(&settings.cache).ok_or_else(|| {
        SettingsError::Validation(vec![ValidationError::new("cache.expiration", "is required")])
    })?;

    let application_name = settings.application_name.clone();
    let service = ConfigurationService::new(api.clone());
    let configurations = service.fetch_configurations(&application_name).await?;

    let snapshot: ConfigurationSnapshot = configurations
        .into_iter()
        .map(|c| (c.key, c.value))
        .collect();

    tracing::info!(
        scope = %settings.scope(),
        application = %application_name,
        count = snapshot.len(),
        "Initial configuration loaded"
    );

    Ok(Bootstrap {
        api,
        application_name,
        cache_options,
        snapshot,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot() {
        let snapshot: ConfigurationSnapshot = [
            ("A".to_string(), "1".to_string()),
            ("B".to_string(), String::new()),
        ]
        .into_iter()
        .collect();

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get("A"), Some("1"));
        assert_eq!(snapshot.get("B"), Some(""));
        assert_eq!(snapshot.get("a"), None);
    }

    #[tokio::test]
    async fn test_bootstrap_rejects_invalid_settings() {
        let err = bootstrap(&ClientSettings::default()).await.unwrap_err();
        assert!(matches!(err, StartupError::Settings(SettingsError::Validation(_))));
    }

    #[test]
    fn test_connect_requires_scoped_endpoint() {
        let cipher = SecretCipher::new(&[3u8; 32]);
        let settings = ClientSettings {
            instance: "Acme".to_string(),
            environment: "Missing".to_string(),
            ..ClientSettings::default()
        };
        let err = connect(&settings, &cipher).unwrap_err();
        assert!(err.to_string().contains("Acme.Missing"));
    }

    #[test]
    fn test_connect_reports_bad_password_ciphertext() {
        let cipher = SecretCipher::new(&[3u8; 32]);
        let mut settings = ClientSettings {
            instance: "Acme".to_string(),
            environment: "Test".to_string(),
            ..ClientSettings::default()
        };
        settings.environments.insert(
            "Acme.Test".to_string(),
            crate::config::EndpointSettings {
                base_url: "https://config.test".to_string(),
                certificate_path: "/nonexistent/client.pfx".into(),
                certificate_password: SecretCipher::new(&[4u8; 32]).encrypt("pw").unwrap(),
            },
        );
        let err = connect(&settings, &cipher).unwrap_err();
        assert!(matches!(err, StartupError::Secret(SecretError::Decrypt)));
    }
}
