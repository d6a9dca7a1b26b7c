//! Service layer for the status registry.
//! - `store`: the key-value client seam and its backends (Redis, memory, JSON file).
//! - `status`: business rules for reading and registering statuses.
//! - `metrics`: Prometheus counters and histograms for store calls.

pub mod errors;
pub mod metrics;
pub mod status;
pub mod store;
#[cfg(test)]
pub mod test_support;

pub use errors::ServiceError;
pub use status::{StatusEntry, StatusService};
