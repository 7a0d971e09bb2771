//! Entity capability trait and per-type metadata.

mod registry;
mod rules;
mod value;

pub use registry::{ModelMetadata, Registry};
pub use rules::{KeyFields, Rules, ScalarType};
pub use value::{
    get_int_set, get_optional_int, get_optional_string, get_string, get_string_set,
    insert_present, is_blank, Attributes, Value,
};

use crate::storage::Result;

/// An entity type that can be stored in a table.
///
/// Implementors are plain structs; the mapping to and from [`Attributes`] is
/// written out explicitly per type.
pub trait Model: Sized + Send + Sync {
    /// Name used in errors and logs.
    const ENTITY_TYPE: &'static str;

    /// Name of the table holding this entity.
    fn table_name() -> &'static str;

    /// Key fields and attribute types.
    fn rules() -> Rules;

    /// Business validation hook. Not invoked automatically on writes.
    fn validate_attributes(&self) -> bool;

    /// Converts the entity into its attribute map.
    fn to_attributes(&self) -> Attributes;

    /// Rebuilds an entity from an attribute map.
    fn from_attributes(attributes: &Attributes) -> Result<Self>;

    /// The hash key and optional range key field names.
    fn primary_key_fields() -> KeyFields {
        Self::rules().required
    }

    /// Declared type of `name`, if any.
    fn field_type(name: &str) -> Option<ScalarType> {
        Self::rules().types.get(name).copied()
    }
}
