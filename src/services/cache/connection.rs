//! Lazily-initialized, self-healing store connection.
//!
//! Responsibility:
//! - Build the client on first use.
//! - PING the cached client before handing it out; on failure drop it and
//!   build exactly one replacement.
//! - Serialize that check-then-rebuild sequence so concurrent callers never
//!   rebuild the same connection twice.
//!
//! The lock only covers the probe and the rebuild. Callers receive a clone of
//! the client and run their commands outside of it.
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::services::cache::client::{CacheClient, CacheConnector, CacheResult};

pub struct LiveConnection<K: CacheConnector> {
    connector: K,
    slot: Mutex<Option<K::Client>>,
}

impl<K: CacheConnector> std::fmt::Debug for LiveConnection<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveConnection").finish_non_exhaustive()
    }
}

impl<K: CacheConnector> LiveConnection<K> {
    pub fn new(connector: K) -> Self {
        Self {
            connector,
            slot: Mutex::new(None),
        }
    }

    /// Returns a client that answered PING (or was just built).
    ///
    /// Fails with the connector's error when no client can be built; there is
    /// no retry beyond the single rebuild.
    pub async fn acquire(&self) -> CacheResult<K::Client> {
        let mut slot = self.slot.lock().await;

        if let Some(client) = slot.as_ref() {
            match client.ping().await {
                Ok(()) => return Ok(client.clone()),
                Err(e) => {
                    warn!(
                        backend = client.backend_name(),
                        error = %e,
                        "cache liveness probe failed, reconnecting"
                    );
                    // Drop the stale client before building its replacement.
                    slot.take();
                }
            }
        }

        let client = self.connector.connect().await.map_err(|e| {
            error!(error = %e, "failed to connect to cache backend");
            e
        })?;

        *slot = Some(client.clone());
        Ok(client)
    }

    /// Drops the cached client. The next `acquire` connects again.
    pub async fn release(&self) {
        if let Some(client) = self.slot.lock().await.take() {
            info!(backend = client.backend_name(), "cache connection released");
        }
    }
}
