use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::traits::StoreBackend;

/// JSON key-value layer over a `StoreBackend`.
///
/// Reads fail closed: absence, unparsable text, and backend errors all
/// degrade to the caller-supplied default. Writes that fail are logged and
/// swallowed. Callers are interaction-bound UI flows and must never crash on
/// storage.
#[derive(Clone)]
pub struct KvStore {
    backend: Arc<dyn StoreBackend>,
}

impl KvStore {
    pub fn new(backend: Arc<dyn StoreBackend>) -> Self {
        Self { backend }
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) {
        let text = match serde_json::to_string(value) {
            Ok(text) => text,
            Err(error) => {
                tracing::warn!(key, error = %error, "serialize failed; value not stored");
                return;
            }
        };
        if let Err(error) = self.backend.write(key, &text) {
            tracing::warn!(key, error = %error, "storage write failed");
        }
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let text = match self.backend.read(key) {
            Ok(Some(text)) => text,
            Ok(None) => return default,
            Err(error) => {
                tracing::warn!(key, error = %error, "storage read failed; using default");
                return default;
            }
        };
        match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!(key, error = %error, "stored value unparsable; using default");
                default
            }
        }
    }

    pub fn remove(&self, key: &str) {
        if let Err(error) = self.backend.remove(key) {
            tracing::warn!(key, error = %error, "storage remove failed");
        }
    }

    pub fn clear(&self) {
        if let Err(error) = self.backend.clear() {
            tracing::warn!(error = %error, "storage clear failed");
        }
    }
}
