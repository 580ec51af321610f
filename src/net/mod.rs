//! Network plumbing.
//!
//! # Responsibilities
//! - Load the client certificate used for mutual TLS
//! - Build the single `reqwest::Client` reused for the process lifetime
//!
//! # Design Decisions
//! - Certificate material is read once at startup; no hot reload
//! - Timeout policy belongs to the transport settings, not the callers

pub mod tls;

pub use tls::{build_http_client, load_identity};
