//! Request-level entry operations.
//!
//! `EntryService` is what the HTTP handlers call: it reads or writes the
//! shared store and returns the finished response text. Locks are released
//! before any rendering happens.

use std::sync::Arc;

use tracing::debug;

use crate::render;
use crate::store::EntryStore;

#[derive(Clone)]
pub struct EntryService {
    store: Arc<dyn EntryStore>,
}

impl EntryService {
    pub fn new(store: Arc<dyn EntryStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn EntryStore> {
        &self.store
    }

    /// Show one entry, or every entry when `key` is missing or empty.
    pub async fn show(&self, key: Option<&str>) -> String {
        match key {
            Some(k) if !k.is_empty() => {
                let value = self.store.get(k).await;
                if value.is_none() {
                    debug!(key = %k, "entry not found; rendering empty value");
                }
                render::entry(k, value.as_deref())
            }
            _ => self.list().await,
        }
    }

    pub async fn list(&self) -> String {
        let snapshot = self.store.get_all().await;
        debug!(entries = snapshot.len(), "listing entries");
        render::list(&snapshot)
    }

    /// Store `value` under `key` and echo what was stored.
    pub async fn update(&self, key: String, value: String) -> String {
        let body = render::updated(&key, &value);
        self.store.put(key, value).await;
        body
    }

    pub fn welcome(&self) -> &'static str {
        render::WELCOME_PAGE
    }
}
