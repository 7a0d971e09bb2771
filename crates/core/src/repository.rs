//! Generic repository mapping one [`Model`] type onto a table.

use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use crate::codec::{decode, encode, encode_key, encode_value, implied_type};
use crate::model::{Attributes, Model, ModelMetadata, Value};
use crate::storage::{
    fetch_all, AttributeValue, ComparisonOperator, Condition, DeleteItemRequest, GetItemRequest,
    Key, PutItemRequest, QueryRequest, ReadRequest, RepositoryError, Result, ScanRequest,
    StoreClient, UpdateItemRequest,
};
use crate::update::{encode_plan, plan, UpdatePlan};

/// An entity together with the attribute snapshot last seen in the store.
///
/// The snapshot is taken when the record is loaded and replaced after every
/// successful save or update. A record built with [`Record::new`] has an empty
/// snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<M> {
    entity: M,
    snapshot: Attributes,
}

impl<M: Model> Record<M> {
    /// Wraps an entity that has not been loaded from the store.
    pub fn new(entity: M) -> Self {
        Self {
            entity,
            snapshot: Attributes::new(),
        }
    }

    /// Builds a record from attributes decoded from the store.
    pub fn from_store(attributes: Attributes) -> Result<Self> {
        Ok(Self {
            entity: M::from_attributes(&attributes)?,
            snapshot: attributes,
        })
    }

    pub fn snapshot(&self) -> &Attributes {
        &self.snapshot
    }

    pub fn into_inner(self) -> M {
        self.entity
    }

    /// Current attributes of the entity.
    pub fn attributes(&self) -> Attributes {
        self.entity.to_attributes()
    }

    /// Overwrites declared fields from `values`; undeclared names are ignored.
    pub fn set_attributes(&mut self, values: Attributes) -> Result<()> {
        let types = M::rules().types;
        let mut merged = self.attributes();
        merged.extend(values.into_iter().filter(|(name, _)| types.contains_key(name)));
        self.entity = M::from_attributes(&merged)?;
        Ok(())
    }

    fn mark_stored(&mut self) {
        self.snapshot = self.entity.to_attributes();
    }
}

impl<M> Deref for Record<M> {
    type Target = M;

    fn deref(&self) -> &M {
        &self.entity
    }
}

impl<M> DerefMut for Record<M> {
    fn deref_mut(&mut self) -> &mut M {
        &mut self.entity
    }
}

/// CRUD and read helpers for one entity type over a [`StoreClient`].
pub struct Repository<M, C: ?Sized> {
    client: Arc<C>,
    metadata: ModelMetadata,
    table_name: String,
    page_size: Option<u32>,
    _model: PhantomData<fn() -> M>,
}

impl<M, C> Repository<M, C>
where
    M: Model,
    C: StoreClient + ?Sized,
{
    /// Creates a repository for `M`, checking its rule declaration.
    pub fn new(client: Arc<C>) -> Result<Self> {
        let metadata = ModelMetadata::of::<M>()?;
        Ok(Self {
            client,
            table_name: metadata.table_name.to_string(),
            metadata,
            page_size: None,
            _model: PhantomData,
        })
    }

    /// Prefixes the model's table name (e.g. `dev_`).
    pub fn with_table_prefix(mut self, prefix: &str) -> Self {
        self.table_name = format!("{}{}", prefix, self.metadata.table_name);
        self
    }

    /// Sets the `Limit` sent with each query or scan page.
    pub fn with_page_size(mut self, page_size: Option<u32>) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    /// Finds one item by primary key. `Ok(None)` when there is no such item.
    pub async fn find_one(
        &self,
        hash_key: impl Into<Value>,
        range_key: Option<Value>,
    ) -> Result<Option<Record<M>>> {
        let key = self.key_from_values(hash_key.into(), range_key)?;
        tracing::debug!(
            entity_type = M::ENTITY_TYPE,
            table = %self.table_name,
            "GetItem"
        );

        let body = self
            .client
            .get_item(GetItemRequest {
                table_name: self.table_name.clone(),
                key,
            })
            .await
            .into_body()?;

        match body.item {
            Some(item) if !item.is_empty() => Ok(Some(Record::from_store(decode(&item)?)?)),
            _ => Ok(None),
        }
    }

    /// Finds every item sharing a hash key.
    pub async fn find_all_by_hash_key(&self, hash_key: impl Into<Value>) -> Result<Vec<Record<M>>> {
        let hash_field = &self.metadata.primary_key_fields().hash_key;
        let value = self.encode_operand(hash_field, &hash_key.into())?;

        let request = QueryRequest {
            table_name: self.table_name.clone(),
            key_conditions: [(hash_field.clone(), Condition::equals(value))].into(),
            limit: self.page_size,
            exclusive_start_key: None,
        };
        self.read_all(ReadRequest::Query(request)).await
    }

    /// Scans for items whose `field` satisfies `comparison` against `values`.
    pub async fn find_all_by(
        &self,
        field: &str,
        comparison: ComparisonOperator,
        values: &[Value],
    ) -> Result<Vec<Record<M>>> {
        let operands = values
            .iter()
            .map(|value| self.encode_operand(field, value))
            .collect::<Result<Vec<_>>>()?;
        let condition = Condition::new(comparison, operands)?;

        let request = ScanRequest {
            table_name: self.table_name.clone(),
            scan_filter: [(field.to_string(), condition)].into(),
            limit: self.page_size,
            exclusive_start_key: None,
        };
        self.read_all(ReadRequest::Scan(request)).await
    }

    /// Scans the whole table.
    pub async fn find_all(&self) -> Result<Vec<Record<M>>> {
        let hash_field = self.metadata.primary_key_fields().hash_key.clone();
        let request = ScanRequest {
            table_name: self.table_name.clone(),
            scan_filter: [(hash_field, Condition::not_null())].into(),
            limit: self.page_size,
            exclusive_start_key: None,
        };
        self.read_all(ReadRequest::Scan(request)).await
    }

    /// Writes the whole entity, replacing any stored item with the same key.
    pub async fn save(&self, record: &mut Record<M>) -> Result<()> {
        let attributes = record.attributes();
        self.key_from_attributes(&attributes)?;
        let item = encode(&attributes, &self.metadata.rules.types)?;

        tracing::debug!(
            entity_type = M::ENTITY_TYPE,
            table = %self.table_name,
            attributes = item.len(),
            "PutItem"
        );
        self.client
            .put_item(PutItemRequest {
                table_name: self.table_name.clone(),
                item,
            })
            .await
            .into_body()?;

        record.mark_stored();
        Ok(())
    }

    /// Sends the attribute changes made since the last load or write.
    ///
    /// Returns the plan that was applied. An empty plan sends nothing.
    pub async fn update(&self, record: &mut Record<M>) -> Result<UpdatePlan> {
        let current = record.attributes();
        let key = self.key_from_attributes(&current)?;
        let updatable = self.metadata.rules.updatable_fields();
        let actions = plan(
            &current,
            record.snapshot(),
            updatable.iter().map(String::as_str),
            &self.metadata.rules.types,
        );

        if actions.is_empty() {
            tracing::debug!(
                entity_type = M::ENTITY_TYPE,
                table = %self.table_name,
                "No attribute changes, skipping UpdateItem"
            );
            record.mark_stored();
            return Ok(actions);
        }

        let attribute_updates = encode_plan(&actions, &self.metadata.rules.types)?;
        tracing::debug!(
            entity_type = M::ENTITY_TYPE,
            table = %self.table_name,
            actions = actions.len(),
            "UpdateItem"
        );
        self.client
            .update_item(UpdateItemRequest {
                table_name: self.table_name.clone(),
                key,
                attribute_updates,
            })
            .await
            .into_body()?;

        record.mark_stored();
        Ok(actions)
    }

    /// Deletes the stored item with the record's key.
    pub async fn delete(&self, record: &Record<M>) -> Result<()> {
        let key = self.key_from_attributes(&record.attributes())?;

        tracing::debug!(
            entity_type = M::ENTITY_TYPE,
            table = %self.table_name,
            "DeleteItem"
        );
        self.client
            .delete_item(DeleteItemRequest {
                table_name: self.table_name.clone(),
                key,
            })
            .await
            .into_body()?;

        Ok(())
    }

    /// Runs the model's validation hook.
    pub fn validate(&self, entity: &M) -> Result<()> {
        if entity.validate_attributes() {
            Ok(())
        } else {
            Err(RepositoryError::Validation {
                entity_type: M::ENTITY_TYPE,
            })
        }
    }

    async fn read_all(&self, request: ReadRequest) -> Result<Vec<Record<M>>> {
        tracing::debug!(
            entity_type = M::ENTITY_TYPE,
            operation = request.operation(),
            table = %self.table_name,
            "Reading all pages"
        );
        fetch_all(self.client.as_ref(), request)
            .await?
            .into_iter()
            .map(Record::from_store)
            .collect()
    }

    fn key_from_attributes(&self, attributes: &Attributes) -> Result<Key> {
        encode_key(
            M::ENTITY_TYPE,
            attributes,
            self.metadata.primary_key_fields(),
            &self.metadata.rules.types,
        )
    }

    fn key_from_values(&self, hash_key: Value, range_key: Option<Value>) -> Result<Key> {
        let fields = self.metadata.primary_key_fields();
        let mut attributes = Attributes::from([(fields.hash_key.clone(), hash_key)]);

        match (&fields.range_key, range_key) {
            (Some(field), Some(value)) => {
                attributes.insert(field.clone(), value);
            }
            (None, Some(_)) => {
                return Err(RepositoryError::InvalidData(format!(
                    "{} has no range key",
                    M::ENTITY_TYPE
                )))
            }
            _ => {}
        }

        self.key_from_attributes(&attributes)
    }

    fn encode_operand(&self, field: &str, value: &Value) -> Result<AttributeValue> {
        let scalar_type = self
            .metadata
            .field_type(field)
            .unwrap_or_else(|| implied_type(value));
        encode_value(field, value, scalar_type)
    }
}
