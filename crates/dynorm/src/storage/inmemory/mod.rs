//! In-memory store backend.
//!
//! Implements `StoreClient` over tables held in `Arc<RwLock<_>>`, following
//! DynamoDB semantics closely enough to exercise the mapper without a service:
//! key validation, `Limit` paging with `LastEvaluatedKey`, scan filters applied
//! after the limit and `AttributeUpdates` actions.
//!
//! # Example
//!
//! ```rust,ignore
//! use dynorm::storage::inmemory::{InMemoryStore, TableSchema};
//!
//! let store = InMemoryStore::new();
//! store.create_table(TableSchema::new("project", "cid").with_range_key("pid")).await;
//! ```

mod conditions;
mod store;

pub use store::{InMemoryStore, TableSchema};
