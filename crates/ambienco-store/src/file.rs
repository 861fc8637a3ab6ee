use crate::store::{KvStore, UpdateFn};
use ambienco_core::{AmbiencoError, AmbiencoResult};
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

/// File-based store: one pretty-printed JSON file per key.
///
/// File names are the hex encoding of the key, so any key is a valid name
/// and prefix scans decode the directory listing. Writes are serialized
/// through one lock so [`KvStore::update`] is atomic within the process.
pub struct FileKvStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FileKvStore {
    /// Opens (and creates if needed) a store rooted at `dir`.
    pub async fn new(dir: PathBuf) -> AmbiencoResult<Self> {
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", hex::encode(key)))
    }

    fn decode_file_name(name: &str) -> Option<String> {
        let stem = name.strip_suffix(".json")?;
        let bytes = hex::decode(stem).ok()?;
        String::from_utf8(bytes).ok()
    }

    async fn read_value(&self, key: &str) -> AmbiencoResult<Option<Value>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let data = tokio::fs::read_to_string(path).await?;
        let value = serde_json::from_str(&data)
            .map_err(|e| AmbiencoError::Store(format!("Failed to parse record '{key}': {e}")))?;
        Ok(Some(value))
    }

    async fn write_value(&self, key: &str, value: &Value) -> AmbiencoResult<()> {
        let path = self.key_path(key);
        let tmp = self.dir.join(format!(".{}.tmp", Uuid::new_v4()));
        let json = serde_json::to_string_pretty(value)?;
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &path).await?;
        debug!(key, "Record written");
        Ok(())
    }
}

#[async_trait]
impl KvStore for FileKvStore {
    async fn get(&self, key: &str) -> AmbiencoResult<Option<Value>> {
        self.read_value(key).await
    }

    async fn set(&self, key: &str, value: Value) -> AmbiencoResult<()> {
        let _guard = self.write_lock.lock().await;
        self.write_value(key, &value).await
    }

    async fn del(&self, key: &str) -> AmbiencoResult<bool> {
        let _guard = self.write_lock.lock().await;
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(false);
        }
        tokio::fs::remove_file(path).await?;
        Ok(true)
    }

    async fn update(&self, key: &str, f: UpdateFn<'_>) -> AmbiencoResult<Value> {
        let _guard = self.write_lock.lock().await;
        let next = f(self.read_value(key).await?)?;
        self.write_value(key, &next).await?;
        Ok(next)
    }

    async fn keys_with_prefix(&self, prefix: &str) -> AmbiencoResult<Vec<String>> {
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        let mut keys = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if let Some(key) = entry
                .file_name()
                .to_str()
                .and_then(Self::decode_file_name)
            {
                if key.starts_with(prefix) {
                    keys.push(key);
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}
