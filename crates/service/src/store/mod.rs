//! Storage abstraction for entries.
//!
//! Every operation is infallible: a missing key is a normal `None`, and there
//! are no capacity or key-format limits.

pub mod memory;

use std::collections::BTreeMap;

use async_trait::async_trait;

pub use memory::MemoryStore;

/// Point-in-time copy of every entry, ordered by key.
pub type Snapshot = BTreeMap<String, String>;

/// Trait abstraction for the entry store shared by all request handlers.
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Current value for `key`, or `None` if it was never put.
    async fn get(&self, key: &str) -> Option<String>;
    /// Copy of all entries; fully captured before the read lock is released.
    async fn get_all(&self) -> Snapshot;
    /// Insert or overwrite `key`.
    async fn put(&self, key: String, value: String);
    async fn len(&self) -> usize;

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
