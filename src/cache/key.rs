//! Cache key derivation.

/// Derive the cache key for an application's configuration list.
///
/// `"{prefix}.Configurations.{application_name}"`. With a fixed prefix the mapping is
/// injective, and it depends on nothing process-local, so every process sharing a
/// distributed tier derives the same key.
pub fn cache_key(prefix: &str, application_name: &str) -> String {
    format!("{}.Configurations.{}", prefix, application_name)
}
