use ambienco_core::{AmbiencoError, AmbiencoResult};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Read-modify-write step for [`KvStore::update`]. Receives the current value
/// (if any) and returns the value to store. An error aborts the update and
/// leaves the stored value untouched.
pub type UpdateFn<'a> = Box<dyn FnOnce(Option<Value>) -> AmbiencoResult<Value> + Send + 'a>;

/// Storage backend holding JSON values under string keys.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Value stored under `key`, if any.
    async fn get(&self, key: &str) -> AmbiencoResult<Option<Value>>;

    /// Insert or overwrite `key`.
    async fn set(&self, key: &str, value: Value) -> AmbiencoResult<()>;

    /// Remove `key`. Returns `false` if it was not present.
    async fn del(&self, key: &str) -> AmbiencoResult<bool>;

    /// Replace the value under `key` with `f(current)`. No other write to
    /// the store can land between the read and the write.
    async fn update(&self, key: &str, f: UpdateFn<'_>) -> AmbiencoResult<Value>;

    /// Keys starting with `prefix`, in ascending key order.
    async fn keys_with_prefix(&self, prefix: &str) -> AmbiencoResult<Vec<String>>;

    /// Values whose key starts with `prefix`, in ascending key order.
    async fn get_by_prefix(&self, prefix: &str) -> AmbiencoResult<Vec<Value>> {
        let mut values = Vec::new();
        for key in self.keys_with_prefix(prefix).await? {
            if let Some(value) = self.get(&key).await? {
                values.push(value);
            }
        }
        Ok(values)
    }
}

/// Typed access to any [`KvStore`].
#[async_trait]
pub trait KvStoreExt: KvStore {
    /// Deserialize the value under `key`.
    async fn get_as<T: DeserializeOwned>(&self, key: &str) -> AmbiencoResult<Option<T>> {
        match self.get(key).await? {
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| AmbiencoError::Store(format!("Corrupt record '{key}': {e}"))),
            None => Ok(None),
        }
    }

    /// Serialize `value` under `key`.
    async fn set_as<T: Serialize + Sync>(&self, key: &str, value: &T) -> AmbiencoResult<()> {
        let json = serde_json::to_value(value)?;
        self.set(key, json).await
    }

    /// Typed [`KvStore::update`]. Returns the stored value.
    async fn update_as<T, F>(&self, key: &str, f: F) -> AmbiencoResult<T>
    where
        T: Serialize + DeserializeOwned + Send,
        F: FnOnce(Option<T>) -> AmbiencoResult<T> + Send,
    {
        let stored = self
            .update(
                key,
                Box::new(move |current: Option<Value>| {
                    let current = current
                        .map(serde_json::from_value::<T>)
                        .transpose()
                        .map_err(|e| AmbiencoError::Store(format!("Corrupt record '{key}': {e}")))?;
                    Ok(serde_json::to_value(f(current)?)?)
                }),
            )
            .await?;
        Ok(serde_json::from_value(stored)?)
    }

    /// Deserialize every value under `prefix`.
    async fn get_by_prefix_as<T: DeserializeOwned>(&self, prefix: &str) -> AmbiencoResult<Vec<T>> {
        self.get_by_prefix(prefix)
            .await?
            .into_iter()
            .map(|value| {
                serde_json::from_value(value).map_err(|e| {
                    AmbiencoError::Store(format!("Corrupt record under '{prefix}': {e}"))
                })
            })
            .collect()
    }
}

impl<S: KvStore + ?Sized> KvStoreExt for S {}
