//! Store clients for the status registry.
//!
//! `StatusStore` is the only seam between the service and the key-value
//! backend. Implementations are thin call-throughs: Redis for deployments,
//! an in-memory map and a JSON file for local runs and tests.

pub mod json_file;
pub mod memory;
pub mod redis_store;

use std::sync::Arc;

use async_trait::async_trait;
use configs::{StoreBackend, StoreConfig};
use thiserror::Error;

pub use self::json_file::JsonFileStatusStore;
pub use self::memory::MemoryStatusStore;
pub use self::redis_store::RedisStatusStore;

/// Transport-level failures raised by a store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("connection error: {0}")]
    Connection(String),
    /// The store answered, but not with something usable (e.g. WRONGTYPE).
    #[error("unexpected store response: {0}")]
    Response(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    /// Metrics outcome label for a failed call.
    pub fn outcome(&self) -> &'static str {
        match self {
            StoreError::Response(_) => "bad_response",
            _ => "error",
        }
    }
}

/// Per-key string GET/SET against a key-value backend.
/// Implementations must be safe for concurrent use from many requests.
#[async_trait]
pub trait StatusStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    async fn ping(&self) -> Result<(), StoreError>;
    fn backend(&self) -> &'static str;
}

/// Build the backend selected in configuration.
pub async fn build_store(cfg: &StoreConfig) -> Result<Arc<dyn StatusStore>, StoreError> {
    let store: Arc<dyn StatusStore> = match cfg.backend {
        StoreBackend::Redis => Arc::new(RedisStatusStore::new(&cfg.url)?),
        StoreBackend::Memory => Arc::new(MemoryStatusStore::new()),
        StoreBackend::File => JsonFileStatusStore::new(&cfg.file_path).await?,
    };
    tracing::info!(backend = store.backend(), "status store ready");
    Ok(store)
}
