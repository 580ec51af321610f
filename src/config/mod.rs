//! Settings management subsystem.
//!
//! # Data Flow
//! ```text
//! settings file (TOML)
//!     → loader.rs (parse & deserialize, environment overrides)
//!     → validation.rs (semantic checks)
//!     → ClientSettings (validated, immutable)
//!     → lifecycle::startup (endpoint resolution, client construction)
//! ```
//!
//! # Design Decisions
//! - Settings are immutable once loaded; there is no reload
//! - Endpoint settings are scoped by `"{instance}.{environment}"`
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_settings, SettingsError};
pub use schema::{CacheSettings, ClientSettings, EndpointSettings, HttpSettings, ObservabilityConfig};
pub use validation::{validate_settings, ValidationError};
