//! Service layer of the key-value service.
//! - `store`: the shared string map and its readers-writer discipline.
//! - `entries`: request-level operations on top of a store.
//! - `render`: plain-text response bodies.

pub mod entries;
pub mod render;
pub mod store;
