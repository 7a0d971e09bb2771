use async_trait::async_trait;

use super::types::{
    DeleteItemRequest, GetItemRequest, PutItemRequest, QueryRequest, ScanRequest, StoreResponse,
    UpdateItemRequest,
};

/// Client for a key-value table store.
///
/// Every call resolves to a [`StoreResponse`]; a failed call is an `ok = false`
/// response with a message, not a Rust error. Retries, timeouts and
/// authentication are the implementation's concern.
#[async_trait]
pub trait StoreClient: Send + Sync {
    /// Fetches one item by its full primary key.
    async fn get_item(&self, request: GetItemRequest) -> StoreResponse;

    /// Writes a whole item, replacing any item with the same key.
    async fn put_item(&self, request: PutItemRequest) -> StoreResponse;

    /// Applies per-attribute actions to the item with the given key.
    async fn update_item(&self, request: UpdateItemRequest) -> StoreResponse;

    /// Removes the item with the given key.
    async fn delete_item(&self, request: DeleteItemRequest) -> StoreResponse;

    /// Reads one page of items sharing a hash key.
    async fn query(&self, request: QueryRequest) -> StoreResponse;

    /// Reads one page of a full-table scan.
    async fn scan(&self, request: ScanRequest) -> StoreResponse;
}
