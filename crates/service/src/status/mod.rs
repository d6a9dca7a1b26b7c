//! Status registry: read and register string statuses by key.

pub mod domain;
pub mod service;

pub use self::domain::StatusEntry;
pub use self::service::StatusService;
