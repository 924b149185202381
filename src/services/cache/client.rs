//! Cache client interface used by the visit repository and the connection manager.
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Cache-layer errors (transport/command).
///
/// Note:
/// - We keep this independent from `AppError` so the repository decides what a
///   failure means for the caller (unavailable store vs failed command).
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache connection error: {0}")]
    BackendConnection(String),
    #[error("cache command error: {0}")]
    BackendCommand(String),
}

/// A minimal, string-based cache interface.
///
/// Visits only need `PING`, `GET` and `SET ... EX`.
///
/// Implementations must be cheap to clone (a multiplexed handle or `Arc<...>` inside):
/// the connection manager hands out clones and callers run commands on them
/// without holding any lock.
#[async_trait]
pub trait CacheClient: Clone + Send + Sync + 'static {
    // Returns the cache backend name (for logging).
    fn backend_name(&self) -> &'static str;

    // Liveness probe.
    async fn ping(&self) -> CacheResult<()>;

    // Get UTF-8 string value.
    async fn get_string(&self, key: &str) -> CacheResult<Option<String>>;

    // Set value unconditionally, with TTL. An existing value under `key` is replaced.
    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()>;
}

/// Builds fresh `CacheClient`s. Used by the connection manager on first use and
/// whenever the current client fails its liveness probe.
#[async_trait]
pub trait CacheConnector: Send + Sync + 'static {
    type Client: CacheClient;

    async fn connect(&self) -> CacheResult<Self::Client>;
}

/// Convenience helper to build a TTL from seconds.
pub fn ttl_seconds(seconds: u64) -> Duration {
    Duration::from_secs(seconds)
}
