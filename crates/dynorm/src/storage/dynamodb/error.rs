//! DynamoDB error mapping.
//!
//! Maps AWS SDK errors to the messages carried by failed store responses.

use std::fmt::Debug;

use aws_sdk_dynamodb::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::query::QueryError;
use aws_sdk_dynamodb::operation::scan::ScanError;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;

const THROUGHPUT_EXCEEDED: &str = "Throughput exceeded, please retry";
const REQUEST_LIMIT_EXCEEDED: &str = "Request limit exceeded, please retry";
const INTERNAL_SERVER_ERROR: &str = "DynamoDB internal server error";

fn table_not_found(table_name: &str) -> String {
    format!("Requested resource not found: Table: {} not found", table_name)
}

fn other(operation: &str, err: &impl ProvideErrorMetadata) -> String {
    format!(
        "{} failed: {}",
        operation,
        err.message().or(err.code()).unwrap_or("unknown error")
    )
}

/// Map a GetItem SDK error to a failure message.
pub fn map_get_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<GetItemError, R>,
    table_name: &str,
) -> String {
    match err.into_service_error() {
        GetItemError::ResourceNotFoundException(_) => table_not_found(table_name),
        GetItemError::ProvisionedThroughputExceededException(_) => THROUGHPUT_EXCEEDED.to_string(),
        GetItemError::RequestLimitExceeded(_) => REQUEST_LIMIT_EXCEEDED.to_string(),
        GetItemError::InternalServerError(_) => INTERNAL_SERVER_ERROR.to_string(),
        err => other("GetItem", &err),
    }
}

/// Map a PutItem SDK error to a failure message.
pub fn map_put_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<PutItemError, R>,
    table_name: &str,
) -> String {
    match err.into_service_error() {
        PutItemError::ResourceNotFoundException(_) => table_not_found(table_name),
        PutItemError::ProvisionedThroughputExceededException(_) => THROUGHPUT_EXCEEDED.to_string(),
        PutItemError::RequestLimitExceeded(_) => REQUEST_LIMIT_EXCEEDED.to_string(),
        PutItemError::ItemCollectionSizeLimitExceededException(_) => {
            "Item collection size limit exceeded".to_string()
        }
        PutItemError::TransactionConflictException(_) => {
            "Transaction conflict, please retry".to_string()
        }
        PutItemError::InternalServerError(_) => INTERNAL_SERVER_ERROR.to_string(),
        err => other("PutItem", &err),
    }
}

/// Map an UpdateItem SDK error to a failure message.
pub fn map_update_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<UpdateItemError, R>,
    table_name: &str,
) -> String {
    match err.into_service_error() {
        UpdateItemError::ResourceNotFoundException(_) => table_not_found(table_name),
        UpdateItemError::ProvisionedThroughputExceededException(_) => {
            THROUGHPUT_EXCEEDED.to_string()
        }
        UpdateItemError::RequestLimitExceeded(_) => REQUEST_LIMIT_EXCEEDED.to_string(),
        UpdateItemError::ItemCollectionSizeLimitExceededException(_) => {
            "Item collection size limit exceeded".to_string()
        }
        UpdateItemError::TransactionConflictException(_) => {
            "Transaction conflict, please retry".to_string()
        }
        UpdateItemError::InternalServerError(_) => INTERNAL_SERVER_ERROR.to_string(),
        err => other("UpdateItem", &err),
    }
}

/// Map a DeleteItem SDK error to a failure message.
pub fn map_delete_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<DeleteItemError, R>,
    table_name: &str,
) -> String {
    match err.into_service_error() {
        DeleteItemError::ResourceNotFoundException(_) => table_not_found(table_name),
        DeleteItemError::ProvisionedThroughputExceededException(_) => {
            THROUGHPUT_EXCEEDED.to_string()
        }
        DeleteItemError::RequestLimitExceeded(_) => REQUEST_LIMIT_EXCEEDED.to_string(),
        DeleteItemError::InternalServerError(_) => INTERNAL_SERVER_ERROR.to_string(),
        err => other("DeleteItem", &err),
    }
}

/// Map a Query SDK error to a failure message.
pub fn map_query_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<QueryError, R>,
    table_name: &str,
) -> String {
    match err.into_service_error() {
        QueryError::ResourceNotFoundException(_) => table_not_found(table_name),
        QueryError::ProvisionedThroughputExceededException(_) => THROUGHPUT_EXCEEDED.to_string(),
        QueryError::RequestLimitExceeded(_) => REQUEST_LIMIT_EXCEEDED.to_string(),
        QueryError::InternalServerError(_) => INTERNAL_SERVER_ERROR.to_string(),
        err => other("Query", &err),
    }
}

/// Map a Scan SDK error to a failure message.
pub fn map_scan_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<ScanError, R>,
    table_name: &str,
) -> String {
    match err.into_service_error() {
        ScanError::ResourceNotFoundException(_) => table_not_found(table_name),
        ScanError::ProvisionedThroughputExceededException(_) => THROUGHPUT_EXCEEDED.to_string(),
        ScanError::RequestLimitExceeded(_) => REQUEST_LIMIT_EXCEEDED.to_string(),
        ScanError::InternalServerError(_) => INTERNAL_SERVER_ERROR.to_string(),
        err => other("Scan", &err),
    }
}
