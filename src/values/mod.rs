//! Typed reads over cached configuration values.
//!
//! # Responsibilities
//! - Look up single values by exact, case-sensitive key
//! - Parse values with the target type's `FromStr` rule
//! - Expose the whole key-value set as an immutable snapshot
//!
//! # Design Decisions
//! - Every read goes through the cache-aside accessor, so values stay runtime-fresh
//! - Data-shape problems (missing key, unparsable value) are soft: `None` or default
//! - Outages are hard: a failed fetch surfaces as `ClientError`

pub mod timespan;

use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;

use crate::cache::ConfigurationCache;
use crate::client::{ClientResult, Configuration};
use crate::observability::metrics;

pub use timespan::{TimeSpan, TimeSpanParseError};

/// Typed accessor over the cached configuration of any application.
#[derive(Debug, Clone)]
pub struct ConfigurationValues {
    cache: ConfigurationCache,
}

impl ConfigurationValues {
    pub fn new(cache: ConfigurationCache) -> Self {
        Self { cache }
    }

    /// The underlying cache.
    pub fn cache(&self) -> &ConfigurationCache {
        &self.cache
    }

    /// Raw value for `key`, or `None` when the application has no such key.
    pub async fn get_value(&self, application_name: &str, key: &str) -> ClientResult<Option<String>> {
        let configurations = self.configurations(application_name).await?;
        Ok(find(&configurations, key).map(|c| c.value.clone()))
    }

    /// Raw value for `key`, or `default` when absent.
    pub async fn get_value_or(
        &self,
        application_name: &str,
        key: &str,
        default: &str,
    ) -> ClientResult<String> {
        Ok(self
            .get_value(application_name, key)
            .await?
            .unwrap_or_else(|| default.to_string()))
    }

    /// Value for `key` parsed as `T`.
    ///
    /// `None` when the key is missing or the value does not parse; parse failures are
    /// logged, not raised. Parsing is `T`'s own `FromStr`, so `bool` accepts only the
    /// lowercase `true` and `false` (`"True"` resolves to `None`).
    pub async fn get_typed_value<T>(&self, application_name: &str, key: &str) -> ClientResult<Option<T>>
    where
        T: FromStr,
        T::Err: Display,
    {
        let Some(raw) = self.get_value(application_name, key).await? else {
            return Ok(None);
        };

        match raw.trim().parse::<T>() {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                metrics::record_parse_failure();
                tracing::warn!(
                    application = %application_name,
                    key = %key,
                    target = std::any::type_name::<T>(),
                    error = %e,
                    "Configuration value could not be parsed"
                );
                Ok(None)
            }
        }
    }

    /// Value for `key` parsed as `T`, or `default` on a missing key or parse failure.
    pub async fn get_typed_value_or<T>(&self, application_name: &str, key: &str, default: T) -> ClientResult<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        Ok(self
            .get_typed_value(application_name, key)
            .await?
            .unwrap_or(default))
    }

    /// Snapshot of every key-value pair; empty when the application has none.
    ///
    /// Duplicate keys resolve to the last occurrence.
    pub async fn get_all(&self, application_name: &str) -> ClientResult<HashMap<String, String>> {
        let configurations = self.configurations(application_name).await?;
        Ok(configurations
            .iter()
            .map(|c| (c.key.clone(), c.value.clone()))
            .collect())
    }

    /// True when the application has `key`, whatever its value (including empty).
    pub async fn contains_key(&self, application_name: &str, key: &str) -> ClientResult<bool> {
        let configurations = self.configurations(application_name).await?;
        Ok(find(&configurations, key).is_some())
    }

    /// Invalidate and repopulate the application's cached configuration.
    pub async fn refresh(&self, application_name: &str) -> ClientResult<()> {
        let fresh = self.cache.invalidate(application_name).await?;
        tracing::info!(
            application = %application_name,
            count = fresh.len(),
            "Configuration refreshed"
        );
        Ok(())
    }

    async fn configurations(&self, application_name: &str) -> ClientResult<Arc<Vec<Configuration>>> {
        self.cache
            .get_configurations_for_application(application_name)
            .await
    }
}

/// Last entry with exactly `key`, matching the map view of [`ConfigurationValues::get_all`].
fn find<'a>(configurations: &'a [Configuration], key: &str) -> Option<&'a Configuration> {
    configurations.iter().rev().find(|c| c.key == key)
}
