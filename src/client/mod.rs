//! Remote Configuration API client.
//!
//! # Data Flow
//! ```text
//! certificate (PKCS#12) + password
//!     → net::tls (identity, reqwest::Client)
//!     → http.rs (ApiClient: base URL, envelope handling)
//!     → configuration.rs / application.rs / heartbeat.rs (one call per endpoint)
//!     → ApiResponse<T> (content, status, error detail)
//! ```
//!
//! # Design Decisions
//! - One proxy type per remote controller, all sharing one `ApiClient`
//! - Business-rule validation stays on the server; failures arrive as statuses
//! - Timestamps decode with or without an offset (see `timestamp`)

pub mod application;
pub mod configuration;
pub mod error;
pub mod heartbeat;
pub mod http;
pub mod timestamp;
pub mod types;

pub use application::ApplicationService;
pub use configuration::ConfigurationService;
pub use error::{ClientError, ClientResult};
pub use heartbeat::HeartbeatService;
pub use http::{ApiClient, ApiErrorDetail, ApiResponse};
pub use types::{Application, Configuration};
