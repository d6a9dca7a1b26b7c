use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{StatusStore, StoreError};

/// Process-local store. Used when no external backend is configured.
#[derive(Clone, Default)]
pub struct MemoryStatusStore {
    inner: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[async_trait]
impl StatusStore for MemoryStatusStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let map = self.inner.read().await;
        Ok(map.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut map = self.inner.write().await;
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
