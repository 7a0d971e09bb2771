//! Store backend implementations.
//!
//! This module provides concrete implementations of the `StoreClient` trait
//! defined in `dynorm_core::storage`, selected via feature flags.
//!
//! # Feature Flags
//!
//! - `inmemory` (default): in-memory store seeded with demo data
//! - `dynamodb`: AWS DynamoDB store using `aws-sdk-dynamodb`
//!
//! When both are enabled, the binary picks DynamoDB.
//!
//! # Examples
//!
//! Build with DynamoDB:
//! ```bash
//! cargo build -p dynorm --features dynamodb
//! ```

#[cfg(not(any(feature = "inmemory", feature = "dynamodb")))]
compile_error!(
    "No store backend selected. Enable 'inmemory' or 'dynamodb' feature. \
    Example: cargo build -p dynorm --features dynamodb"
);

#[cfg(feature = "inmemory")]
pub mod inmemory;

#[cfg(feature = "dynamodb")]
pub mod dynamodb;

#[cfg(feature = "inmemory")]
pub use inmemory::{InMemoryStore, TableSchema};

#[cfg(feature = "dynamodb")]
pub use dynamodb::DynamoDbStore;

use dynorm_core::storage::{ResponseBody, StoreResponse};

/// Wraps the outcome of one backend call into a store response, logging it.
pub(crate) fn respond(
    operation: &str,
    table_name: &str,
    result: Result<ResponseBody, String>,
) -> StoreResponse {
    match result {
        Ok(body) => {
            tracing::debug!(operation, table = table_name, count = body.count, "Store call");
            StoreResponse::success(body)
        }
        Err(message) => {
            tracing::warn!(operation, table = table_name, error = %message, "Store call failed");
            StoreResponse::failure(message)
        }
    }
}
