pub mod client;
pub mod connection;
#[cfg(test)]
pub mod memory;
pub mod valkey;

pub use client::{CacheClient, CacheConnector, CacheError};
pub use connection::LiveConnection;
pub use valkey::ValkeyConnector;
