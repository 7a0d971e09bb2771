//! DynamoDB store implementation.
//!
//! Implements `StoreClient` over `aws-sdk-dynamodb`, using the classic
//! `KeyConditions` / `ScanFilter` / `AttributeUpdates` request parameters.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;

use dynorm_core::storage::{
    DeleteItemRequest, GetItemRequest, PutItemRequest, QueryRequest, ResponseBody, ScanRequest,
    StoreClient, StoreResponse, UpdateItemRequest,
};

use super::conversions::{
    from_sdk_item, to_sdk_condition, to_sdk_item, to_sdk_limit, to_sdk_update, SdkItem,
};
use super::error::{
    map_delete_item_error, map_get_item_error, map_put_item_error, map_query_error,
    map_scan_error, map_update_item_error,
};
use crate::config::Config;
use crate::storage::respond;

/// DynamoDB-backed store.
#[derive(Debug, Clone)]
pub struct DynamoDbStore {
    client: Client,
}

impl DynamoDbStore {
    /// Creates a store with the given DynamoDB client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Creates a store using the AWS default credential chain.
    ///
    /// `region` and `endpoint_url` from the configuration override the SDK
    /// defaults (e.g. to target DynamoDB Local).
    pub async fn from_config(config: &Config) -> Self {
        let mut sdk_config_loader = aws_config::defaults(aws_config::BehaviorVersion::latest());

        if let Some(region) = &config.region {
            sdk_config_loader = sdk_config_loader.region(aws_config::Region::new(region.clone()));
        }
        if let Some(endpoint) = &config.endpoint_url {
            sdk_config_loader = sdk_config_loader.endpoint_url(endpoint);
        }

        let sdk_config = sdk_config_loader.load().await;
        Self::new(Client::new(&sdk_config))
    }
}

fn items_body(
    items: Option<Vec<SdkItem>>,
    last_evaluated_key: Option<SdkItem>,
) -> Result<ResponseBody, String> {
    let items = items
        .unwrap_or_default()
        .into_iter()
        .map(from_sdk_item)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ResponseBody {
        count: items.len(),
        items,
        last_evaluated_key: last_evaluated_key.map(from_sdk_item).transpose()?,
        ..ResponseBody::default()
    })
}

impl DynamoDbStore {
    async fn try_get_item(&self, request: &GetItemRequest) -> Result<ResponseBody, String> {
        let result = self
            .client
            .get_item()
            .table_name(&request.table_name)
            .set_key(Some(to_sdk_item(&request.key)?))
            .send()
            .await
            .map_err(|e| map_get_item_error(e, &request.table_name))?;

        let item = result.item.map(from_sdk_item).transpose()?;
        Ok(ResponseBody {
            count: usize::from(item.is_some()),
            item,
            ..ResponseBody::default()
        })
    }

    async fn try_put_item(&self, request: &PutItemRequest) -> Result<ResponseBody, String> {
        self.client
            .put_item()
            .table_name(&request.table_name)
            .set_item(Some(to_sdk_item(&request.item)?))
            .send()
            .await
            .map_err(|e| map_put_item_error(e, &request.table_name))?;

        Ok(ResponseBody::default())
    }

    async fn try_update_item(&self, request: &UpdateItemRequest) -> Result<ResponseBody, String> {
        let attribute_updates: HashMap<_, _> = request
            .attribute_updates
            .iter()
            .map(|(name, update)| Ok((name.clone(), to_sdk_update(update)?)))
            .collect::<Result<_, String>>()?;

        self.client
            .update_item()
            .table_name(&request.table_name)
            .set_key(Some(to_sdk_item(&request.key)?))
            .set_attribute_updates(Some(attribute_updates))
            .send()
            .await
            .map_err(|e| map_update_item_error(e, &request.table_name))?;

        Ok(ResponseBody::default())
    }

    async fn try_delete_item(&self, request: &DeleteItemRequest) -> Result<ResponseBody, String> {
        self.client
            .delete_item()
            .table_name(&request.table_name)
            .set_key(Some(to_sdk_item(&request.key)?))
            .send()
            .await
            .map_err(|e| map_delete_item_error(e, &request.table_name))?;

        Ok(ResponseBody::default())
    }

    async fn try_query(&self, request: &QueryRequest) -> Result<ResponseBody, String> {
        let key_conditions: HashMap<_, _> = request
            .key_conditions
            .iter()
            .map(|(name, condition)| Ok((name.clone(), to_sdk_condition(condition)?)))
            .collect::<Result<_, String>>()?;
        let exclusive_start_key = request
            .exclusive_start_key
            .as_ref()
            .map(to_sdk_item)
            .transpose()?;

        let result = self
            .client
            .query()
            .table_name(&request.table_name)
            .set_key_conditions(Some(key_conditions))
            .set_limit(to_sdk_limit(request.limit)?)
            .set_exclusive_start_key(exclusive_start_key)
            .send()
            .await
            .map_err(|e| map_query_error(e, &request.table_name))?;

        items_body(result.items, result.last_evaluated_key)
    }

    async fn try_scan(&self, request: &ScanRequest) -> Result<ResponseBody, String> {
        let scan_filter: HashMap<_, _> = request
            .scan_filter
            .iter()
            .map(|(name, condition)| Ok((name.clone(), to_sdk_condition(condition)?)))
            .collect::<Result<_, String>>()?;
        let exclusive_start_key = request
            .exclusive_start_key
            .as_ref()
            .map(to_sdk_item)
            .transpose()?;

        let result = self
            .client
            .scan()
            .table_name(&request.table_name)
            .set_scan_filter((!scan_filter.is_empty()).then_some(scan_filter))
            .set_limit(to_sdk_limit(request.limit)?)
            .set_exclusive_start_key(exclusive_start_key)
            .send()
            .await
            .map_err(|e| map_scan_error(e, &request.table_name))?;

        items_body(result.items, result.last_evaluated_key)
    }
}

#[async_trait]
impl StoreClient for DynamoDbStore {
    async fn get_item(&self, request: GetItemRequest) -> StoreResponse {
        respond("GetItem", &request.table_name, self.try_get_item(&request).await)
    }

    async fn put_item(&self, request: PutItemRequest) -> StoreResponse {
        respond("PutItem", &request.table_name, self.try_put_item(&request).await)
    }

    async fn update_item(&self, request: UpdateItemRequest) -> StoreResponse {
        respond(
            "UpdateItem",
            &request.table_name,
            self.try_update_item(&request).await,
        )
    }

    async fn delete_item(&self, request: DeleteItemRequest) -> StoreResponse {
        respond(
            "DeleteItem",
            &request.table_name,
            self.try_delete_item(&request).await,
        )
    }

    async fn query(&self, request: QueryRequest) -> StoreResponse {
        respond("Query", &request.table_name, self.try_query(&request).await)
    }

    async fn scan(&self, request: ScanRequest) -> StoreResponse {
        respond("Scan", &request.table_name, self.try_scan(&request).await)
    }
}
