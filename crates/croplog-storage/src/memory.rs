use std::collections::HashMap;
use std::sync::Mutex;

use crate::traits::StoreBackend;

/// In-memory backend for tests. Not durable.
#[derive(Default)]
pub struct MemoryBackend {
    inner: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StoreBackend for MemoryBackend {
    fn read(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.inner.lock().unwrap().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.inner
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.inner.lock().unwrap().remove(key);
        Ok(())
    }

    fn clear(&self) -> anyhow::Result<()> {
        self.inner.lock().unwrap().clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_read_remove() {
        let backend = MemoryBackend::new();
        backend.write("a", "1").unwrap();
        assert_eq!(backend.read("a").unwrap().as_deref(), Some("1"));
        backend.remove("a").unwrap();
        assert_eq!(backend.read("a").unwrap(), None);
    }

    #[test]
    fn clear_empties_everything() {
        let backend = MemoryBackend::new();
        backend.write("a", "1").unwrap();
        backend.write("b", "2").unwrap();
        backend.clear().unwrap();
        assert_eq!(backend.read("a").unwrap(), None);
        assert_eq!(backend.read("b").unwrap(), None);
    }
}
