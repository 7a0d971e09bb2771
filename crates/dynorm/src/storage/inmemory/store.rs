//! In-memory store implementation.

use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use dynorm_core::model::Model;
use dynorm_core::storage::{
    AttributeAction, AttributeValue, AttributeValueUpdate, DeleteItemRequest, GetItemRequest,
    Item, Key, PutItemRequest, QueryRequest, ResponseBody, ScanRequest, StoreClient,
    StoreResponse, UpdateItemRequest,
};

use super::conditions::matches;
use crate::storage::respond;

/// Key attribute names of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub name: String,
    pub hash_key: String,
    pub range_key: Option<String>,
}

impl TableSchema {
    pub fn new(name: impl Into<String>, hash_key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hash_key: hash_key.into(),
            range_key: None,
        }
    }

    pub fn with_range_key(mut self, range_key: impl Into<String>) -> Self {
        self.range_key = Some(range_key.into());
        self
    }

    /// Schema of the table `name` keyed the way `M` is.
    pub fn for_model<M: Model>(name: impl Into<String>) -> Self {
        let keys = M::primary_key_fields();
        Self {
            name: name.into(),
            hash_key: keys.hash_key,
            range_key: keys.range_key,
        }
    }

    fn is_key(&self, field: &str) -> bool {
        self.hash_key == field || self.range_key.as_deref() == Some(field)
    }
}

/// Sortable form of one key attribute.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum KeyPart {
    Number(i128),
    Text(String),
}

type ItemKey = (KeyPart, Option<KeyPart>);

#[derive(Debug)]
struct Table {
    schema: TableSchema,
    items: BTreeMap<ItemKey, Item>,
}

impl Table {
    fn new(schema: TableSchema) -> Self {
        Self {
            schema,
            items: BTreeMap::new(),
        }
    }

    /// Extracts the item key from `attributes`, which may hold other attributes too.
    fn key_of(&self, attributes: &HashMap<String, AttributeValue>) -> Result<ItemKey, String> {
        let hash = key_part(&self.schema.hash_key, attributes)?;
        let range = match &self.schema.range_key {
            Some(field) => Some(key_part(field, attributes)?),
            None => None,
        };
        Ok((hash, range))
    }

    /// Extracts the item key from a key that must hold exactly the key attributes.
    fn exact_key(&self, key: &Key) -> Result<ItemKey, String> {
        let expected = 1 + usize::from(self.schema.range_key.is_some());
        if key.len() != expected {
            return Err("The provided key element does not match the schema".to_string());
        }
        self.key_of(key)
    }

    fn key_attributes(&self, item: &Item) -> Key {
        item.iter()
            .filter(|(field, _)| self.schema.is_key(field))
            .map(|(field, value)| (field.clone(), value.clone()))
            .collect()
    }

    /// Reads up to `limit` items after `start` among those accepted by `select`.
    ///
    /// Returns the page and, when more candidates remain, the key of the last
    /// item read.
    fn read_page(
        &self,
        start: Option<&Key>,
        limit: Option<u32>,
        select: impl Fn(&Item) -> bool,
    ) -> Result<(Vec<Item>, Option<Key>), String> {
        let limit = match limit {
            Some(0) => return Err("Limit must be greater than or equal to 1".to_string()),
            Some(limit) => limit as usize,
            None => usize::MAX,
        };
        let lower = match start {
            Some(key) => Bound::Excluded(self.key_of(key)?),
            None => Bound::Unbounded,
        };

        let mut candidates = self
            .items
            .range((lower, Bound::Unbounded))
            .map(|(_, item)| item)
            .filter(|item| select(item));
        let page: Vec<Item> = candidates.by_ref().take(limit).cloned().collect();

        let last_evaluated_key = if page.len() == limit && candidates.next().is_some() {
            page.last().map(|item| self.key_attributes(item))
        } else {
            None
        };

        Ok((page, last_evaluated_key))
    }
}

fn key_part(field: &str, attributes: &HashMap<String, AttributeValue>) -> Result<KeyPart, String> {
    match attributes.get(field) {
        Some(AttributeValue::S(s)) | Some(AttributeValue::B(s)) => Ok(KeyPart::Text(s.clone())),
        Some(AttributeValue::N(n)) => n
            .trim()
            .parse()
            .map(KeyPart::Number)
            .map_err(|_| format!("Invalid number for key attribute {}", field)),
        Some(other) => Err(format!(
            "Key attribute {} has unsupported type {}",
            field,
            other.tag()
        )),
        None => Err(format!("Missing the key {} in the item", field)),
    }
}

fn apply_update(item: &mut Item, field: &str, update: &AttributeValueUpdate) -> Result<(), String> {
    match (update.action, &update.value) {
        (AttributeAction::Put, Some(value)) => {
            item.insert(field.to_string(), value.clone());
        }
        (AttributeAction::Put, None) => {
            return Err(format!("PUT on {} requires a value", field));
        }
        (AttributeAction::Delete, None) => {
            item.remove(field);
        }
        (AttributeAction::Delete, Some(value)) => {
            let remaining = match (item.get(field), value) {
                (None, _) => return Ok(()),
                (Some(AttributeValue::Ss(set)), AttributeValue::Ss(removed)) => {
                    AttributeValue::Ss(set_difference(set, removed))
                }
                (Some(AttributeValue::Ns(set)), AttributeValue::Ns(removed)) => {
                    AttributeValue::Ns(set_difference(set, removed))
                }
                (Some(AttributeValue::Bs(set)), AttributeValue::Bs(removed)) => {
                    AttributeValue::Bs(set_difference(set, removed))
                }
                _ => {
                    return Err(format!(
                        "DELETE with a value on {} requires matching set types",
                        field
                    ))
                }
            };
            if is_empty_set(&remaining) {
                item.remove(field);
            } else {
                item.insert(field.to_string(), remaining);
            }
        }
        (AttributeAction::Add, Some(value)) => {
            let sum = match (item.get(field), value) {
                (None, AttributeValue::N(_))
                | (None, AttributeValue::Ss(_))
                | (None, AttributeValue::Ns(_))
                | (None, AttributeValue::Bs(_)) => value.clone(),
                (Some(AttributeValue::N(current)), AttributeValue::N(delta)) => {
                    AttributeValue::N(add_numbers(field, current, delta)?)
                }
                (Some(AttributeValue::Ss(set)), AttributeValue::Ss(added)) => {
                    AttributeValue::Ss(set_union(set, added))
                }
                (Some(AttributeValue::Ns(set)), AttributeValue::Ns(added)) => {
                    AttributeValue::Ns(set_union(set, added))
                }
                (Some(AttributeValue::Bs(set)), AttributeValue::Bs(added)) => {
                    AttributeValue::Bs(set_union(set, added))
                }
                _ => {
                    return Err(format!(
                        "ADD on {} is only supported for number and set attributes",
                        field
                    ))
                }
            };
            item.insert(field.to_string(), sum);
        }
        (AttributeAction::Add, None) => {
            return Err(format!("ADD on {} requires a value", field));
        }
    }
    Ok(())
}

fn add_numbers(field: &str, current: &str, delta: &str) -> Result<String, String> {
    let parse = |text: &str| {
        text.trim()
            .parse::<i128>()
            .map_err(|_| format!("Invalid number {:?} for {}", text, field))
    };
    Ok((parse(current)? + parse(delta)?).to_string())
}

fn set_union(set: &[String], added: &[String]) -> Vec<String> {
    let mut union = set.to_vec();
    for member in added {
        if !union.contains(member) {
            union.push(member.clone());
        }
    }
    union
}

fn set_difference(set: &[String], removed: &[String]) -> Vec<String> {
    set.iter()
        .filter(|member| !removed.contains(member))
        .cloned()
        .collect()
}

fn is_empty_set(value: &AttributeValue) -> bool {
    match value {
        AttributeValue::Ss(set) | AttributeValue::Ns(set) | AttributeValue::Bs(set) => {
            set.is_empty()
        }
        _ => false,
    }
}

/// In-memory store for development and tests.
///
/// Tables must be created with [`InMemoryStore::create_table`] before use.
/// Data is not persisted and is lost when the last clone is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<HashMap<String, Table>>>,
}

impl InMemoryStore {
    /// Creates a new store without tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table. Returns `false` if a table with that name exists.
    pub async fn create_table(&self, schema: TableSchema) -> bool {
        let mut tables = self.tables.write().await;
        if tables.contains_key(&schema.name) {
            return false;
        }
        tracing::debug!(table = %schema.name, hash_key = %schema.hash_key, "Created table");
        tables.insert(schema.name.clone(), Table::new(schema));
        true
    }

    /// Number of items in a table, or `None` if the table does not exist.
    pub async fn item_count(&self, table_name: &str) -> Option<usize> {
        let tables = self.tables.read().await;
        tables.get(table_name).map(|table| table.items.len())
    }
}

fn table<'a>(tables: &'a HashMap<String, Table>, name: &str) -> Result<&'a Table, String> {
    tables
        .get(name)
        .ok_or_else(|| format!("Requested resource not found: Table: {} not found", name))
}

fn table_mut<'a>(
    tables: &'a mut HashMap<String, Table>,
    name: &str,
) -> Result<&'a mut Table, String> {
    tables
        .get_mut(name)
        .ok_or_else(|| format!("Requested resource not found: Table: {} not found", name))
}

fn items_body(items: Vec<Item>, last_evaluated_key: Option<Key>) -> ResponseBody {
    ResponseBody {
        count: items.len(),
        items,
        last_evaluated_key,
        ..ResponseBody::default()
    }
}

#[async_trait]
impl StoreClient for InMemoryStore {
    async fn get_item(&self, request: GetItemRequest) -> StoreResponse {
        let tables = self.tables.read().await;
        let result = table(&tables, &request.table_name).and_then(|table| {
            let key = table.exact_key(&request.key)?;
            let item = table.items.get(&key).cloned();
            Ok(ResponseBody {
                count: usize::from(item.is_some()),
                item,
                ..ResponseBody::default()
            })
        });
        respond("GetItem", &request.table_name, result)
    }

    async fn put_item(&self, request: PutItemRequest) -> StoreResponse {
        let mut tables = self.tables.write().await;
        let result = table_mut(&mut tables, &request.table_name).and_then(|table| {
            let key = table.key_of(&request.item)?;
            table.items.insert(key, request.item.clone());
            Ok(ResponseBody::default())
        });
        respond("PutItem", &request.table_name, result)
    }

    async fn update_item(&self, request: UpdateItemRequest) -> StoreResponse {
        let mut tables = self.tables.write().await;
        let result = table_mut(&mut tables, &request.table_name).and_then(|table| {
            let key = table.exact_key(&request.key)?;
            if let Some(field) = request
                .attribute_updates
                .keys()
                .find(|field| table.schema.is_key(field))
            {
                return Err(format!(
                    "Cannot update attribute {}. This attribute is part of the key",
                    field
                ));
            }

            let mut item = table
                .items
                .get(&key)
                .cloned()
                .unwrap_or_else(|| request.key.clone());
            for (field, update) in &request.attribute_updates {
                apply_update(&mut item, field, update)?;
            }
            table.items.insert(key, item);
            Ok(ResponseBody::default())
        });
        respond("UpdateItem", &request.table_name, result)
    }

    async fn delete_item(&self, request: DeleteItemRequest) -> StoreResponse {
        let mut tables = self.tables.write().await;
        let result = table_mut(&mut tables, &request.table_name).and_then(|table| {
            let key = table.exact_key(&request.key)?;
            table.items.remove(&key);
            Ok(ResponseBody::default())
        });
        respond("DeleteItem", &request.table_name, result)
    }

    async fn query(&self, request: QueryRequest) -> StoreResponse {
        let tables = self.tables.read().await;
        let result = table(&tables, &request.table_name).and_then(|table| {
            if !request.key_conditions.contains_key(&table.schema.hash_key) {
                return Err(format!(
                    "Query condition missed key schema element: {}",
                    table.schema.hash_key
                ));
            }
            if let Some(field) = request
                .key_conditions
                .keys()
                .find(|field| !table.schema.is_key(field))
            {
                return Err(format!(
                    "Query key condition not supported on non-key attribute {}",
                    field
                ));
            }

            let (items, last_evaluated_key) = table.read_page(
                request.exclusive_start_key.as_ref(),
                request.limit,
                |item| {
                    request
                        .key_conditions
                        .iter()
                        .all(|(field, condition)| matches(item.get(field), condition))
                },
            )?;
            Ok(items_body(items, last_evaluated_key))
        });
        respond("Query", &request.table_name, result)
    }

    async fn scan(&self, request: ScanRequest) -> StoreResponse {
        let tables = self.tables.read().await;
        let result = table(&tables, &request.table_name).and_then(|table| {
            let (page, last_evaluated_key) =
                table.read_page(request.exclusive_start_key.as_ref(), request.limit, |_| true)?;
            let items = page
                .into_iter()
                .filter(|item| {
                    request
                        .scan_filter
                        .iter()
                        .all(|(field, condition)| matches(item.get(field), condition))
                })
                .collect();
            Ok(items_body(items, last_evaluated_key))
        });
        respond("Scan", &request.table_name, result)
    }
}
