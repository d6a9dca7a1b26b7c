#![cfg(test)]
use std::time::Duration;

use async_trait::async_trait;

use crate::store::{StatusStore, StoreError};

/// Store whose connection is gone: every call fails immediately.
pub struct FailingStore;

#[async_trait]
impl StatusStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Connection("connection refused".into()))
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Connection("connection refused".into()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError::Connection("connection refused".into()))
    }

    fn backend(&self) -> &'static str {
        "failing"
    }
}

/// Store that never answers within any reasonable timeout.
pub struct HangingStore;

#[async_trait]
impl StatusStore for HangingStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "hanging"
    }
}

/// Store that answers with a value of the wrong type.
pub struct GarbledStore;

#[async_trait]
impl StatusStore for GarbledStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Response("WRONGTYPE Operation against a key holding the wrong kind of value".into()))
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Response("WRONGTYPE Operation against a key holding the wrong kind of value".into()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "garbled"
    }
}
