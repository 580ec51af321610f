//! Settings loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ClientSettings;
use crate::config::validation::{validate_settings, ValidationError};

/// Overrides the deployment instance identifier.
pub const INSTANCE_ENV_VAR: &str = "CONFIG_CLIENT_INSTANCE";

/// Overrides the environment identifier.
pub const ENVIRONMENT_ENV_VAR: &str = "CONFIG_CLIENT_ENVIRONMENT";

/// Overrides the application loaded at startup.
pub const APPLICATION_NAME_ENV_VAR: &str = "CONFIG_CLIENT_APPLICATION_NAME";

/// Error type for settings loading.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load, apply environment overrides, and validate settings from a TOML file.
pub fn load_settings(path: &Path) -> Result<ClientSettings, SettingsError> {
    let content = fs::read_to_string(path)?;
    let mut settings = parse_settings(&content)?;

    apply_overrides(&mut settings, |name| std::env::var(name).ok());
    validate_settings(&settings).map_err(SettingsError::Validation)?;

    tracing::debug!(
        path = %path.display(),
        scope = %settings.scope(),
        application = %settings.application_name,
        "Settings loaded"
    );
    Ok(settings)
}

/// Parse settings without overrides or validation.
pub fn parse_settings(content: &str) -> Result<ClientSettings, SettingsError> {
    Ok(toml::from_str(content)?)
}

/// Apply identifier overrides from `lookup` (normally the process environment).
pub fn apply_overrides<F>(settings: &mut ClientSettings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(instance) = non_empty(INSTANCE_ENV_VAR) {
        settings.instance = instance;
    }
    if let Some(environment) = non_empty(ENVIRONMENT_ENV_VAR) {
        settings.environment = environment;
    }
    if let Some(application) = non_empty(APPLICATION_NAME_ENV_VAR) {
        settings.application_name = application;
    }
}
