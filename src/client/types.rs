//! Wire types for the Configuration API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::timestamp;

/// Maximum length of an application name or configuration key.
pub const MAX_NAME_LEN: usize = 100;

/// Maximum length of an application description.
pub const MAX_DESCRIPTION_LEN: usize = 1000;

/// A registered application owning a set of configurations.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    /// Server-assigned identifier (0 before insert).
    #[serde(default)]
    pub id: i32,

    /// Unique application name.
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default, with = "timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub created_by: Option<String>,

    /// Null until the first update.
    #[serde(default, with = "timestamp::option")]
    pub modified_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub modified_by: Option<String>,
}

impl Application {
    /// Create an unsaved application.
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            name: name.into(),
            description,
            ..Self::default()
        }
    }

    /// Local field checks mirroring the server's rules.
    ///
    /// The service proxies never call this; the remote API stays authoritative.
    pub fn validate(&self) -> Result<(), String> {
        check_required("name", &self.name, MAX_NAME_LEN)?;
        if let Some(description) = &self.description {
            if description.chars().count() > MAX_DESCRIPTION_LEN {
                return Err(format!(
                    "description exceeds {} characters",
                    MAX_DESCRIPTION_LEN
                ));
            }
        }
        Ok(())
    }
}

/// A single key-value setting belonging to an application.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    #[serde(default)]
    pub id: i32,

    /// Owning application.
    pub application_id: i32,

    /// Key, unique within the owning application.
    pub key: String,

    pub value: String,

    #[serde(default, with = "timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub created_by: Option<String>,

    #[serde(default, with = "timestamp::option")]
    pub modified_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub modified_by: Option<String>,
}

impl Configuration {
    /// Create an unsaved configuration entry.
    pub fn new(application_id: i32, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            application_id,
            key: key.into(),
            value: value.into(),
            ..Self::default()
        }
    }

    /// Local field checks mirroring the server's rules.
    pub fn validate(&self) -> Result<(), String> {
        check_required("key", &self.key, MAX_NAME_LEN)?;
        if self.application_id <= 0 {
            return Err("application_id must be positive".to_string());
        }
        Ok(())
    }

    /// True when both records carry the same user-visible fields.
    ///
    /// Audit timestamps are server-assigned and ignored.
    pub fn same_content(&self, other: &Configuration) -> bool {
        self.id == other.id
            && self.application_id == other.application_id
            && self.key == other.key
            && self.value == other.value
    }
}

fn check_required(field: &str, value: &str, max_len: usize) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} is required", field));
    }
    if value.chars().count() > max_len {
        return Err(format!("{} exceeds {} characters", field, max_len));
    }
    Ok(())
}
