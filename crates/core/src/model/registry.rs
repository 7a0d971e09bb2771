use std::collections::BTreeMap;

use crate::storage::{RepositoryError, Result};

use super::{KeyFields, Model, Rules, ScalarType};

/// Resolved metadata for one entity type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelMetadata {
    pub entity_type: &'static str,
    pub table_name: &'static str,
    pub rules: Rules,
}

impl ModelMetadata {
    /// Resolves the metadata of `M`, checking its rule declaration.
    pub fn of<M: Model>() -> Result<Self> {
        let rules = M::rules();
        rules
            .check()
            .map_err(|reason| RepositoryError::InvalidRules {
                entity_type: M::ENTITY_TYPE,
                reason,
            })?;

        Ok(Self {
            entity_type: M::ENTITY_TYPE,
            table_name: M::table_name(),
            rules,
        })
    }

    pub fn primary_key_fields(&self) -> &KeyFields {
        &self.rules.required
    }

    pub fn field_type(&self, name: &str) -> Option<ScalarType> {
        self.rules.types.get(name).copied()
    }
}

/// Metadata for a set of entity types, keyed by entity type name.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    models: BTreeMap<&'static str, ModelMetadata>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `M` to the registry. Registering the same type twice is a no-op.
    pub fn register<M: Model>(&mut self) -> Result<&ModelMetadata> {
        let metadata = ModelMetadata::of::<M>()?;
        Ok(&*self.models.entry(metadata.entity_type).or_insert(metadata))
    }

    /// Looks up an entity type by name.
    pub fn get(&self, entity_type: &str) -> Option<&ModelMetadata> {
        self.models.get(entity_type)
    }

    /// Iterates over registered entity types in name order.
    pub fn iter(&self) -> impl Iterator<Item = &ModelMetadata> {
        self.models.values()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
