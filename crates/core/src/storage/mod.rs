mod error;
mod pagination;
mod traits;
mod types;

pub use error::{DecodeError, RepositoryError, Result};
pub use pagination::{fetch_all, ReadRequest};
pub use traits::StoreClient;
pub use types::{
    AttributeAction, AttributeValue, AttributeValueUpdate, ComparisonOperator, Condition,
    DeleteItemRequest, GetItemRequest, Item, Key, PutItemRequest, QueryRequest, ResponseBody,
    ScanRequest, StoreResponse, UpdateItemRequest,
};
