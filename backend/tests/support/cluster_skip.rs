//! Opt-in policy for scenarios that need an embedded PostgreSQL cluster.

/// Returns true when `RUN_PG_EMBEDDED` is set to `1`.
pub fn embedded_cluster_enabled() -> bool {
    std::env::var("RUN_PG_EMBEDDED").as_deref() == Ok("1")
}
