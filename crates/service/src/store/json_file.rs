use std::{collections::HashMap, path::{Path, PathBuf}, sync::Arc};

use async_trait::async_trait;
use tokio::{fs, sync::RwLock};

use super::{StatusStore, StoreError};

/// JSON file-backed status map.
///
/// Keeps the whole `key -> value` map in memory and rewrites the file after
/// every `set`. Meant for single-node development setups where running Redis
/// is overkill.
#[derive(Clone)]
pub struct JsonFileStatusStore {
    inner: Arc<RwLock<HashMap<String, String>>>,
    file_path: PathBuf,
}

impl JsonFileStatusStore {
    /// Initialize the store from a path. Creates the file with an empty map if missing.
    /// A file that exists but does not hold a JSON string map is an error.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, StoreError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.ok();
        }

        let map: HashMap<String, String> = match fs::read(&file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| StoreError::Serialization(format!("{}: {e}", file_path.display())))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let empty: HashMap<String, String> = HashMap::new();
                write_map(&file_path, &empty).await?;
                empty
            }
            Err(e) => return Err(StoreError::Io(e.to_string())),
        };

        Ok(Arc::new(Self { inner: Arc::new(RwLock::new(map)), file_path }))
    }

    pub fn file_path(&self) -> &PathBuf {
        &self.file_path
    }
}

async fn write_map(path: &Path, map: &HashMap<String, String>) -> Result<(), StoreError> {
    let data = serde_json::to_vec(map).map_err(|e| StoreError::Serialization(e.to_string()))?;
    // write-then-rename so a crash never leaves a truncated file behind
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, data).await.map_err(|e| StoreError::Io(e.to_string()))?;
    fs::rename(&tmp, path).await.map_err(|e| StoreError::Io(e.to_string()))?;
    Ok(())
}

#[async_trait]
impl StatusStore for JsonFileStatusStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let map = self.inner.read().await;
        Ok(map.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        // hold the write lock across the save so concurrent writers persist in order
        let mut map = self.inner.write().await;
        let previous = map.insert(key.to_string(), value.to_string());
        if let Err(e) = write_map(&self.file_path, &map).await {
            match previous {
                Some(v) => map.insert(key.to_string(), v),
                None => map.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        fs::metadata(&self.file_path)
            .await
            .map(|_| ())
            .map_err(|e| StoreError::Io(e.to_string()))
    }

    fn backend(&self) -> &'static str {
        "file"
    }
}
