use serde::{Deserialize, Serialize};

/// One stored status. The value is opaque text; `"false"` is as valid as any other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEntry {
    pub key: String,
    pub value: String,
}

impl StatusEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self { key: key.into(), value: value.into() }
    }

    /// Human-readable confirmation returned after a successful register.
    pub fn confirmation(&self) -> String {
        format!("Set {} to {}", self.key, self.value)
    }
}
