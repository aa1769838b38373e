use crate::cache::error::CacheError;
use crate::cache::store::ResponseStore;
use async_trait::async_trait;
use std::collections::{hash_map::Entry, HashMap};
use tokio::sync::Mutex;

/// In-process [`ResponseStore`]; entries live as long as the store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[async_trait]
impl ResponseStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn put(&self, key: &str, body: &[u8]) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().await;
        if let Entry::Vacant(entry) = entries.entry(key.to_string()) {
            entry.insert(body.to_vec());
        }
        Ok(())
    }
}
