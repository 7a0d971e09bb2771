//! DynamoDB store backend.
//!
//! This module provides a `StoreClient` implementation over `aws-sdk-dynamodb`.

mod conversions;
mod error;
mod store;

pub use store::DynamoDbStore;
