use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, trace};

use super::{EntryStore, Snapshot};

/// In-process `String -> String` map behind a readers-writer lock.
///
/// `get`, `get_all` and `len` share the read lock; `put` holds the write lock
/// for exactly one map insert. Nothing ever removes an entry.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty store ready to be handed to every handler.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        let map = self.inner.read().await;
        let value = map.get(key).cloned();
        trace!(%key, found = value.is_some(), "store get");
        value
    }

    pub async fn get_all(&self) -> Snapshot {
        let map = self.inner.read().await;
        map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    pub async fn put(&self, key: String, value: String) {
        let mut map = self.inner.write().await;
        let previous = map.insert(key, value);
        let len = map.len();
        drop(map);
        debug!(overwrote = previous.is_some(), len, "store put");
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl EntryStore for MemoryStore {
    async fn get(&self, key: &str) -> Option<String> {
        self.get(key).await
    }

    async fn get_all(&self) -> Snapshot {
        self.get_all().await
    }

    async fn put(&self, key: String, value: String) {
        self.put(key, value).await
    }

    async fn len(&self) -> usize {
        self.len().await
    }
}
