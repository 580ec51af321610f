//! Source of truth behind the cache.

use async_trait::async_trait;

use crate::client::{ClientResult, Configuration, ConfigurationService};

/// Fetches the authoritative configuration list for an application.
#[async_trait]
pub trait ConfigurationSource: Send + Sync {
    async fn fetch_configurations(&self, application_name: &str) -> ClientResult<Vec<Configuration>>;
}

/// Unwraps the proxy envelope: non-2xx becomes an error, an empty body an empty list.
#[async_trait]
impl ConfigurationSource for ConfigurationService {
    async fn fetch_configurations(&self, application_name: &str) -> ClientResult<Vec<Configuration>> {
        let configurations = self
            .get_by_application_name(application_name)
            .await?
            .into_result()?
            .unwrap_or_default();
        Ok(configurations)
    }
}
