//! Lifecycle management.
//!
//! # Data Flow
//! ```text
//! process start
//!     → startup.rs (settings → endpoint → certificate client → initial fetch)
//!     → Bootstrap { api, snapshot, cache options }
//!     → into_values() for runtime-fresh reads
//! ```

pub mod startup;

pub use startup::{bootstrap, bootstrap_with_client, connect, Bootstrap, ConfigurationSnapshot, StartupError};
