use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, instrument, warn};

use crate::errors::ServiceError;
use crate::metrics::{self, STORE_DURATION};
use crate::status::domain::StatusEntry;
use crate::store::{StatusStore, StoreError};

/// Application service for the status registry.
///
/// Holds no state of its own; every call is a single bounded round trip to
/// the injected store. Timeouts and transport failures both surface as
/// `ServiceError::StoreUnavailable`, an absent key as `ServiceError::NotFound`.
#[derive(Clone)]
pub struct StatusService {
    store: Arc<dyn StatusStore>,
    timeout: Duration,
}

impl StatusService {
    pub fn new(store: Arc<dyn StatusStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    /// Look up the current value for `key`.
    #[instrument(skip(self))]
    pub async fn read(&self, key: &str) -> Result<StatusEntry, ServiceError> {
        validate_key(key)?;
        let value = self.bounded("get", self.store.get(key)).await?;
        info!(key, value = ?value, found = value.is_some(), "status read");
        match value {
            Some(value) => {
                metrics::record_outcome("get", "ok");
                Ok(StatusEntry::new(key, value))
            }
            None => {
                metrics::record_outcome("get", "not_found");
                Err(ServiceError::not_found(key))
            }
        }
    }

    /// Overwrite the value for `key` and return a confirmation message.
    #[instrument(skip(self))]
    pub async fn write(&self, key: &str, value: &str) -> Result<String, ServiceError> {
        validate_key(key)?;
        self.bounded("set", self.store.set(key, value)).await?;
        metrics::record_outcome("set", "ok");
        info!(key, value, "status registered");
        Ok(StatusEntry::new(key, value).confirmation())
    }

    /// Check the store is reachable; used by the readiness endpoint.
    pub async fn ping(&self) -> Result<(), ServiceError> {
        self.bounded("ping", self.store.ping()).await?;
        metrics::record_outcome("ping", "ok");
        Ok(())
    }

    async fn bounded<T, F>(&self, op: &'static str, fut: F) -> Result<T, ServiceError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        let _timer = STORE_DURATION.with_label_values(&[op]).start_timer();
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(Ok(v)) => Ok(v),
            Ok(Err(e)) => {
                metrics::record_outcome(op, e.outcome());
                warn!(op, backend = self.store.backend(), error = %e, "store call failed");
                Err(e.into())
            }
            Err(_) => {
                metrics::record_outcome(op, "timeout");
                warn!(op, backend = self.store.backend(), timeout_ms = self.timeout.as_millis() as u64, "store call timed out");
                Err(ServiceError::StoreUnavailable(format!(
                    "{op} timed out after {}ms",
                    self.timeout.as_millis()
                )))
            }
        }
    }
}

fn validate_key(key: &str) -> Result<(), ServiceError> {
    if key.is_empty() {
        return Err(ServiceError::Validation("key must not be empty".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStatusStore;
    use crate::test_support::{FailingStore, GarbledStore, HangingStore};

    fn service_with(store: Arc<dyn StatusStore>) -> StatusService {
        StatusService::new(store, Duration::from_millis(200))
    }

    #[tokio::test]
    async fn unwritten_key_is_not_found() {
        let svc = service_with(Arc::new(MemoryStatusStore::new()));
        let err = svc.read("never-written").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn write_then_read_returns_value() -> Result<(), anyhow::Error> {
        let svc = service_with(Arc::new(MemoryStatusStore::new()));
        let msg = svc.write("alpha", "42").await?;
        assert!(msg.contains("alpha") && msg.contains("42"));

        let entry = svc.read("alpha").await?;
        assert_eq!(entry, StatusEntry::new("alpha", "42"));
        Ok(())
    }

    #[tokio::test]
    async fn last_write_wins() -> Result<(), anyhow::Error> {
        let svc = service_with(Arc::new(MemoryStatusStore::new()));
        svc.write("alpha", "v1").await?;
        svc.write("alpha", "v2").await?;
        assert_eq!(svc.read("alpha").await?.value, "v2");
        Ok(())
    }

    #[tokio::test]
    async fn false_is_an_ordinary_value() -> Result<(), anyhow::Error> {
        let svc = service_with(Arc::new(MemoryStatusStore::new()));
        svc.write("flag", "false").await?;
        assert_eq!(svc.read("flag").await?.value, "false");
        Ok(())
    }

    #[tokio::test]
    async fn empty_value_is_accepted() -> Result<(), anyhow::Error> {
        let svc = service_with(Arc::new(MemoryStatusStore::new()));
        svc.write("blank", "").await?;
        assert_eq!(svc.read("blank").await?.value, "");
        Ok(())
    }

    #[tokio::test]
    async fn empty_key_is_rejected_without_touching_the_store() {
        let store = MemoryStatusStore::new();
        let svc = service_with(Arc::new(store.clone()));

        let err = svc.write("", "x").await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        let err = svc.read("").await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn whitespace_key_is_an_ordinary_key() -> Result<(), anyhow::Error> {
        let svc = service_with(Arc::new(MemoryStatusStore::new()));
        svc.write(" ", "x").await?;
        assert_eq!(svc.read(" ").await?.value, "x");
        Ok(())
    }

    #[tokio::test]
    async fn store_failure_is_unavailable_not_missing() {
        let svc = service_with(Arc::new(FailingStore));
        assert!(matches!(svc.read("alpha").await, Err(ServiceError::StoreUnavailable(_))));
        assert!(matches!(svc.write("alpha", "42").await, Err(ServiceError::StoreUnavailable(_))));
        assert!(matches!(svc.ping().await, Err(ServiceError::StoreUnavailable(_))));
    }

    #[tokio::test]
    async fn unusable_store_reply_is_unavailable_and_counted_apart() {
        let before = metrics::STORE_OPERATIONS_TOTAL.with_label_values(&["get", "bad_response"]).get();
        let svc = service_with(Arc::new(GarbledStore));
        let err = svc.read("alpha").await.unwrap_err();
        assert!(matches!(err, ServiceError::StoreUnavailable(ref m) if m.contains("unexpected store response")));
        let after = metrics::STORE_OPERATIONS_TOTAL.with_label_values(&["get", "bad_response"]).get();
        assert!(after > before);
    }

    #[tokio::test]
    async fn hanging_store_times_out() {
        let svc = StatusService::new(Arc::new(HangingStore), Duration::from_millis(50));
        let started = std::time::Instant::now();
        let err = svc.read("alpha").await.unwrap_err();
        assert!(matches!(err, ServiceError::StoreUnavailable(ref m) if m.contains("timed out")));
        assert!(started.elapsed() < Duration::from_secs(5));

        let err = svc.write("alpha", "42").await.unwrap_err();
        assert!(matches!(err, ServiceError::StoreUnavailable(_)));
    }

    #[tokio::test]
    async fn concurrent_writers_leave_one_of_their_values() -> Result<(), anyhow::Error> {
        let svc = service_with(Arc::new(MemoryStatusStore::new()));
        let mut handles = Vec::new();
        for i in 0..16 {
            let svc = svc.clone();
            handles.push(tokio::spawn(async move { svc.write("shared", &i.to_string()).await }));
        }
        for h in handles {
            h.await??;
        }
        let value: u32 = svc.read("shared").await?.value.parse()?;
        assert!(value < 16);
        Ok(())
    }
}
