//! Settings validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that the instance/environment scope resolves to an endpoint
//! - Validate value ranges (expiration > 0, timeouts > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientSettings → Result<(), Vec<ValidationError>>
//! - Runs before settings are accepted; a failure is fatal at startup

use std::fmt;
use std::time::Duration;

use url::Url;

use crate::config::schema::ClientSettings;

/// A single semantic problem found in the settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate settings, collecting every error.
pub fn validate_settings(settings: &ClientSettings) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if settings.instance.trim().is_empty() {
        errors.push(ValidationError::new("instance", "is required"));
    }
    if settings.environment.trim().is_empty() {
        errors.push(ValidationError::new("environment", "is required"));
    }
    if settings.application_name.trim().is_empty() {
        errors.push(ValidationError::new("application_name", "is required"));
    }

    let scope = settings.scope();
    match settings.endpoint() {
        None => errors.push(ValidationError::new(
            format!("environments.\"{}\"", scope),
            "no endpoint configured for this instance and environment",
        )),
        Some(endpoint) => {
            let field = |name: &str| format!("environments.\"{}\".{}", scope, name);
            match endpoint.base_url.parse::<Url>() {
                Ok(url) if matches!(url.scheme(), "http" | "https") => {}
                Ok(url) => errors.push(ValidationError::new(
                    field("base_url"),
                    format!("unsupported scheme '{}'", url.scheme()),
                )),
                Err(e) => errors.push(ValidationError::new(field("base_url"), e.to_string())),
            }
            if endpoint.certificate_path.as_os_str().is_empty() {
                errors.push(ValidationError::new(field("certificate_path"), "is required"));
            }
            if endpoint.certificate_password.trim().is_empty() {
                errors.push(ValidationError::new(field("certificate_password"), "is required"));
            }
        }
    }

    match settings.cache.expiration.map(Duration::from) {
        None => errors.push(ValidationError::new(
            "cache.expiration",
            "is required (e.g. \"1.00:00:00\")",
        )),
        Some(d) if d.is_zero() => {
            errors.push(ValidationError::new("cache.expiration", "must be greater than zero"))
        }
        Some(_) => {}
    }
    if let Some(local) = settings.cache.local_expiration.map(Duration::from) {
        if local.is_zero() {
            errors.push(ValidationError::new(
                "cache.local_expiration",
                "must be greater than zero",
            ));
        }
    }
    if settings.cache.prefix.trim().is_empty() {
        errors.push(ValidationError::new("cache.prefix", "must not be empty"));
    }

    if settings.http.connect_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "http.connect_timeout_secs",
            "must be greater than zero",
        ));
    }
    if settings.http.request_timeout_secs == Some(0) {
        errors.push(ValidationError::new(
            "http.request_timeout_secs",
            "must be greater than zero when set",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
