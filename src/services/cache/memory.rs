//! In-process stand-in for Valkey, used by tests.
//!
//! Every client built by one `MemoryConnector` shares the same key space, the
//! way real connections share one server. Tests can kill the newest client,
//! refuse new connections, or make commands fail.
use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;

use crate::services::cache::client::{CacheClient, CacheConnector, CacheError, CacheResult};

#[derive(Default, Debug)]
struct Shared {
    entries: Mutex<HashMap<String, (String, Duration)>>,
    connect_attempts: AtomicUsize,
    connects: AtomicUsize,
    refuse_connections: AtomicBool,
    fail_commands: AtomicBool,
    newest: Mutex<Option<Arc<AtomicBool>>>,
}

#[derive(Clone, Default)]
pub struct MemoryConnector {
    shared: Arc<Shared>,
}

impl MemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connects(&self) -> usize {
        self.shared.connects.load(Ordering::SeqCst)
    }

    pub fn connect_attempts(&self) -> usize {
        self.shared.connect_attempts.load(Ordering::SeqCst)
    }

    pub fn refuse_connections(&self, refuse: bool) {
        self.shared.refuse_connections.store(refuse, Ordering::SeqCst);
    }

    pub fn fail_commands(&self, fail: bool) {
        self.shared.fail_commands.store(fail, Ordering::SeqCst);
    }

    /// Breaks the most recently built client; its PING and commands fail from now on.
    pub fn sever(&self) {
        if let Some(alive) = self.shared.newest.lock().unwrap().as_ref() {
            alive.store(false, Ordering::SeqCst);
        }
    }

    pub fn raw_get(&self, key: &str) -> Option<String> {
        let entries = self.shared.entries.lock().unwrap();
        entries.get(key).map(|(value, _)| value.clone())
    }

    /// Writes a value behind the repository's back.
    pub fn raw_set(&self, key: &str, value: &str) {
        let mut entries = self.shared.entries.lock().unwrap();
        entries.insert(key.to_string(), (value.to_string(), Duration::ZERO));
    }

    /// TTL the last `set_with_ttl` for `key` asked for.
    pub fn ttl_of(&self, key: &str) -> Option<Duration> {
        let entries = self.shared.entries.lock().unwrap();
        entries.get(key).map(|(_, ttl)| *ttl)
    }

    /// Simulates the store purging a key once its TTL ran out.
    pub fn purge(&self, key: &str) {
        self.shared.entries.lock().unwrap().remove(key);
    }
}

#[async_trait]
impl CacheConnector for MemoryConnector {
    type Client = MemoryClient;

    async fn connect(&self) -> CacheResult<MemoryClient> {
        self.shared.connect_attempts.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;

        if self.shared.refuse_connections.load(Ordering::SeqCst) {
            return Err(CacheError::BackendConnection("connection refused".into()));
        }

        let alive = Arc::new(AtomicBool::new(true));
        *self.shared.newest.lock().unwrap() = Some(alive.clone());
        self.shared.connects.fetch_add(1, Ordering::SeqCst);

        Ok(MemoryClient {
            shared: self.shared.clone(),
            alive,
        })
    }
}

#[derive(Clone, Debug)]
pub struct MemoryClient {
    shared: Arc<Shared>,
    alive: Arc<AtomicBool>,
}

impl MemoryClient {
    fn check_command(&self) -> CacheResult<()> {
        if !self.alive.load(Ordering::SeqCst) {
            return Err(CacheError::BackendCommand("broken pipe".into()));
        }
        if self.shared.fail_commands.load(Ordering::SeqCst) {
            return Err(CacheError::BackendCommand("READONLY".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl CacheClient for MemoryClient {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> CacheResult<()> {
        tokio::task::yield_now().await;
        if self.alive.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(CacheError::BackendConnection("connection reset".into()))
        }
    }

    async fn get_string(&self, key: &str) -> CacheResult<Option<String>> {
        self.check_command()?;
        let entries = self.shared.entries.lock().unwrap();
        Ok(entries.get(key).map(|(value, _)| value.clone()))
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        self.check_command()?;
        let mut entries = self.shared.entries.lock().unwrap();
        entries.insert(key.to_string(), (value.to_string(), ttl));
        Ok(())
    }
}
