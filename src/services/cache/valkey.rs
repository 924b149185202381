use async_trait::async_trait;
use std::time::Duration;

use crate::services::cache::client::{CacheClient, CacheConnector, CacheError, CacheResult};

/// Valkey/Redis connector.
///
/// `redis::Client::open` only validates the URL; no socket is opened until
/// `connect` is called.
#[derive(Clone, Debug)]
pub struct ValkeyConnector {
    client: redis::Client,
}

impl ValkeyConnector {
    // Create a connector from a URL like `redis://localhost:6379/0`
    pub fn open(url: &str) -> Result<Self, CacheError> {
        let client =
            redis::Client::open(url).map_err(|e| CacheError::BackendConnection(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl CacheConnector for ValkeyConnector {
    type Client = ValkeyClient;

    async fn connect(&self) -> CacheResult<ValkeyClient> {
        let conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| CacheError::BackendConnection(e.to_string()))?;

        Ok(ValkeyClient { conn })
    }
}

/// Valkey/Redis-backend cache client.
///
/// Wraps a multiplexed connection: clones share the same socket. It does not
/// reconnect on its own; `LiveConnection` decides when to replace it.
#[derive(Clone)]
pub struct ValkeyClient {
    conn: redis::aio::MultiplexedConnection,
}

impl std::fmt::Debug for ValkeyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValkeyClient").finish_non_exhaustive()
    }
}

#[async_trait]
impl CacheClient for ValkeyClient {
    fn backend_name(&self) -> &'static str {
        "valkey"
    }

    async fn ping(&self) -> CacheResult<()> {
        let mut conn = self.conn.clone();

        let _pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| CacheError::BackendConnection(e.to_string()))?;

        Ok(())
    }

    async fn get_string(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.conn.clone();

        let resp: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| CacheError::BackendCommand(e.to_string()))?;

        Ok(resp)
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        // Redis/Valkey: `SET key value EX <seconds>` replies `OK`.
        let mut conn = self.conn.clone();

        // EX expects integer seconds. We clamp to at least 1 sec.
        let ttl_seconds: u64 = ttl.as_secs().max(1);

        let _ok: String = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(ttl_seconds)
            .query_async(&mut conn)
            .await
            .map_err(|e| CacheError::BackendCommand(e.to_string()))?;

        Ok(())
    }
}
