//! Metrics collection.
//!
//! # Metrics
//! - `config_client_requests_total` (counter): remote calls by endpoint, status
//! - `config_client_transport_errors_total` (counter): calls that got no response
//! - `config_client_cache_hits_total` (counter): hits by tier (local, distributed)
//! - `config_client_cache_misses_total` (counter): lookups that reached the source
//! - `config_client_source_fetches_total` (counter): source fetches by outcome
//! - `config_client_invalidations_total` (counter)
//! - `config_client_value_parse_failures_total` (counter)
//!
//! # Design Decisions
//! - Facade only; the embedding process installs a recorder (or none)
//! - Label values come from small fixed sets to keep cardinality bounded

use metrics::counter;

pub fn record_request(endpoint: &'static str, status: u16) {
    counter!(
        "config_client_requests_total",
        "endpoint" => endpoint,
        "status" => status.to_string()
    )
    .increment(1);
}

pub fn record_transport_error(endpoint: &'static str) {
    counter!("config_client_transport_errors_total", "endpoint" => endpoint).increment(1);
}

/// Record a cache hit on `tier` ("local" or "distributed").
pub fn record_cache_hit(tier: &'static str) {
    counter!("config_client_cache_hits_total", "tier" => tier).increment(1);
}

pub fn record_cache_miss() {
    counter!("config_client_cache_misses_total").increment(1);
}

pub fn record_source_fetch(success: bool) {
    let outcome = if success { "success" } else { "error" };
    counter!("config_client_source_fetches_total", "outcome" => outcome).increment(1);
}

pub fn record_invalidation() {
    counter!("config_client_invalidations_total").increment(1);
}

pub fn record_parse_failure() {
    counter!("config_client_value_parse_failures_total").increment(1);
}
