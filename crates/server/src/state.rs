use std::sync::Arc;
use std::time::Duration;

use service::store::StatusStore;
use service::StatusService;

/// Shared router state. Cheap to clone: the store handle sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub status: StatusService,
}

impl AppState {
    pub fn new(store: Arc<dyn StatusStore>, timeout: Duration) -> Self {
        Self { status: StatusService::new(store, timeout) }
    }
}
