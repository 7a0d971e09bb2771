//! Test fixtures: a sample model and a store that replays scripted responses.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::model::{
    get_optional_int, get_optional_string, get_string, get_string_set, insert_present,
    Attributes, Model, Rules, ScalarType,
};
use crate::storage::{
    AttributeValue, DeleteItemRequest, GetItemRequest, PutItemRequest, QueryRequest,
    ResponseBody, Result, ScanRequest, StoreClient, StoreResponse, UpdateItemRequest,
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Widget {
    pub id: String,
    pub sku: String,
    pub label: Option<String>,
    pub count: Option<i64>,
    pub tags: Vec<String>,
}

impl Widget {
    pub fn new(id: &str, sku: &str) -> Self {
        Self {
            id: id.to_string(),
            sku: sku.to_string(),
            ..Self::default()
        }
    }
}

impl Model for Widget {
    const ENTITY_TYPE: &'static str = "Widget";

    fn table_name() -> &'static str {
        "widgets"
    }

    fn rules() -> Rules {
        Rules::new("id")
            .with_range_key("sku")
            .field("id", ScalarType::String)
            .field("sku", ScalarType::String)
            .field("label", ScalarType::String)
            .field("count", ScalarType::Number)
            .field("tags", ScalarType::StringSet)
    }

    fn validate_attributes(&self) -> bool {
        self.label.as_deref() != Some("invalid")
    }

    fn to_attributes(&self) -> Attributes {
        let mut attributes = Attributes::new();
        insert_present(&mut attributes, "id", self.id.as_str());
        insert_present(&mut attributes, "sku", self.sku.as_str());
        if let Some(label) = &self.label {
            insert_present(&mut attributes, "label", label.as_str());
        }
        if let Some(count) = self.count {
            insert_present(&mut attributes, "count", count);
        }
        insert_present(&mut attributes, "tags", self.tags.clone());
        attributes
    }

    fn from_attributes(attributes: &Attributes) -> Result<Self> {
        Ok(Self {
            id: get_string(attributes, "id")?,
            sku: get_string(attributes, "sku")?,
            label: get_optional_string(attributes, "label"),
            count: get_optional_int(attributes, "count")?,
            tags: get_string_set(attributes, "tags")?,
        })
    }
}

/// A successful page of widget items, one per id.
pub fn page(ids: &[&str], last_evaluated: Option<&str>) -> StoreResponse {
    let items: Vec<_> = ids.iter().map(|id| widget_item(id, "sku-1")).collect();
    StoreResponse::success(ResponseBody {
        count: items.len(),
        items,
        last_evaluated_key: last_evaluated.map(|id| {
            HashMap::from([("id".to_string(), AttributeValue::S(id.to_string()))])
        }),
        ..ResponseBody::default()
    })
}

pub fn widget_item(id: &str, sku: &str) -> HashMap<String, AttributeValue> {
    HashMap::from([
        ("id".to_string(), AttributeValue::S(id.to_string())),
        ("sku".to_string(), AttributeValue::S(sku.to_string())),
    ])
}

/// Replays queued responses per operation and records every request.
#[derive(Default)]
pub struct ScriptedStore {
    responses: Mutex<HashMap<&'static str, VecDeque<StoreResponse>>>,
    gets: Mutex<Vec<GetItemRequest>>,
    puts: Mutex<Vec<PutItemRequest>>,
    updates: Mutex<Vec<UpdateItemRequest>>,
    deletes: Mutex<Vec<DeleteItemRequest>>,
    queries: Mutex<Vec<QueryRequest>>,
    scans: Mutex<Vec<ScanRequest>>,
}

impl ScriptedStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, operation: &'static str, response: StoreResponse) {
        self.responses
            .lock()
            .unwrap()
            .entry(operation)
            .or_default()
            .push_back(response);
    }

    fn next(&self, operation: &'static str) -> StoreResponse {
        self.responses
            .lock()
            .unwrap()
            .get_mut(operation)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| StoreResponse::failure(format!("no scripted {operation} response")))
    }

    pub fn push_get(&self, response: StoreResponse) {
        self.push("GetItem", response);
    }

    pub fn push_put(&self, response: StoreResponse) {
        self.push("PutItem", response);
    }

    pub fn push_update(&self, response: StoreResponse) {
        self.push("UpdateItem", response);
    }

    pub fn push_delete(&self, response: StoreResponse) {
        self.push("DeleteItem", response);
    }

    pub fn push_query(&self, response: StoreResponse) {
        self.push("Query", response);
    }

    pub fn push_scan(&self, response: StoreResponse) {
        self.push("Scan", response);
    }

    pub fn get_requests(&self) -> Vec<GetItemRequest> {
        self.gets.lock().unwrap().clone()
    }

    pub fn put_requests(&self) -> Vec<PutItemRequest> {
        self.puts.lock().unwrap().clone()
    }

    pub fn update_requests(&self) -> Vec<UpdateItemRequest> {
        self.updates.lock().unwrap().clone()
    }

    pub fn delete_requests(&self) -> Vec<DeleteItemRequest> {
        self.deletes.lock().unwrap().clone()
    }

    pub fn query_requests(&self) -> Vec<QueryRequest> {
        self.queries.lock().unwrap().clone()
    }

    pub fn scan_requests(&self) -> Vec<ScanRequest> {
        self.scans.lock().unwrap().clone()
    }

    pub fn scan_calls(&self) -> usize {
        self.scans.lock().unwrap().len()
    }
}

#[async_trait]
impl StoreClient for ScriptedStore {
    async fn get_item(&self, request: GetItemRequest) -> StoreResponse {
        self.gets.lock().unwrap().push(request);
        self.next("GetItem")
    }

    async fn put_item(&self, request: PutItemRequest) -> StoreResponse {
        self.puts.lock().unwrap().push(request);
        self.next("PutItem")
    }

    async fn update_item(&self, request: UpdateItemRequest) -> StoreResponse {
        self.updates.lock().unwrap().push(request);
        self.next("UpdateItem")
    }

    async fn delete_item(&self, request: DeleteItemRequest) -> StoreResponse {
        self.deletes.lock().unwrap().push(request);
        self.next("DeleteItem")
    }

    async fn query(&self, request: QueryRequest) -> StoreResponse {
        self.queries.lock().unwrap().push(request);
        self.next("Query")
    }

    async fn scan(&self, request: ScanRequest) -> StoreResponse {
        self.scans.lock().unwrap().push(request);
        self.next("Scan")
    }
}
