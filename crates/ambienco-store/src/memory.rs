use crate::store::{KvStore, UpdateFn};
use ambienco_core::AmbiencoResult;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// In-memory store. Contents are lost when the process exits.
pub struct InMemoryKvStore {
    entries: RwLock<BTreeMap<String, Value>>,
}

impl InMemoryKvStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of stored keys.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns `true` if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for InMemoryKvStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KvStore for InMemoryKvStore {
    async fn get(&self, key: &str) -> AmbiencoResult<Option<Value>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> AmbiencoResult<()> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn del(&self, key: &str) -> AmbiencoResult<bool> {
        Ok(self.entries.write().await.remove(key).is_some())
    }

    async fn update(&self, key: &str, f: UpdateFn<'_>) -> AmbiencoResult<Value> {
        let mut entries = self.entries.write().await;
        let next = f(entries.get(key).cloned())?;
        entries.insert(key.to_string(), next.clone());
        Ok(next)
    }

    async fn keys_with_prefix(&self, prefix: &str) -> AmbiencoResult<Vec<String>> {
        let entries = self.entries.read().await;
        Ok(entries
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect())
    }

    async fn get_by_prefix(&self, prefix: &str) -> AmbiencoResult<Vec<Value>> {
        let entries = self.entries.read().await;
        Ok(entries
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(_, value)| value.clone())
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use ambienco_core::AmbiencoError;
    use serde_json::json;

    #[tokio::test]
    async fn test_prefix_scan_is_ordered_and_bounded() {
        let store = InMemoryKvStore::new();
        store.set("product:b", json!(2)).await.unwrap();
        store.set("product:a", json!(1)).await.unwrap();
        store.set("productz", json!(9)).await.unwrap();
        store.set("contact:a", json!(3)).await.unwrap();

        let values = store.get_by_prefix("product:").await.unwrap();
        assert_eq!(values, vec![json!(1), json!(2)]);
        assert_eq!(store.len().await, 4);
    }

    #[tokio::test]
    async fn test_del_reports_presence() {
        let store = InMemoryKvStore::new();
        store.set("k", json!("v")).await.unwrap();
        assert!(store.del("k").await.unwrap());
        assert!(!store.del("k").await.unwrap());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_failed_update_keeps_value() {
        let store = InMemoryKvStore::new();
        store.set("k", json!(1)).await.unwrap();
        let err = store
            .update(
                "k",
                Box::new(|_: Option<Value>| Err(AmbiencoError::NotFound("gone".into()))),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AmbiencoError::NotFound(_)));
        assert_eq!(store.get("k").await.unwrap(), Some(json!(1)));
    }
}
