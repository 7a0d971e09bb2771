//! Conversion between typed attributes and tagged wire values.
//!
//! Pure functions, testable without a store.

use std::collections::BTreeMap;

use crate::model::{Attributes, KeyFields, ScalarType, Value};
use crate::storage::{AttributeValue, DecodeError, Item, Key, RepositoryError, Result};

/// Decodes a wire item into typed attributes.
///
/// `S` and `B` become strings, `SS` and `BS` string sets, `N` and `NS`
/// integers. Any other tag is a [`DecodeError`].
pub fn decode(item: &Item) -> std::result::Result<Attributes, DecodeError> {
    item.iter()
        .map(|(field, value)| Ok((field.clone(), decode_value(field, value)?)))
        .collect()
}

/// Decodes a single tagged value.
pub fn decode_value(
    field: &str,
    value: &AttributeValue,
) -> std::result::Result<Value, DecodeError> {
    match value {
        AttributeValue::S(s) | AttributeValue::B(s) => Ok(Value::Str(s.clone())),
        AttributeValue::Ss(set) | AttributeValue::Bs(set) => Ok(Value::StrSet(set.clone())),
        AttributeValue::N(n) => parse_number(field, n).map(Value::Int),
        AttributeValue::Ns(set) => set
            .iter()
            .map(|n| parse_number(field, n))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map(Value::IntSet),
        other => Err(DecodeError::UnsupportedType {
            field: field.to_string(),
            tag: other.tag(),
        }),
    }
}

/// Encodes attributes into a wire item.
///
/// Each attribute uses its type from `types`, or the type implied by its value
/// when undeclared. Empty values are left out.
pub fn encode(attributes: &Attributes, types: &BTreeMap<String, ScalarType>) -> Result<Item> {
    attributes
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(field, value)| {
            let scalar_type = types
                .get(field)
                .copied()
                .unwrap_or_else(|| implied_type(value));
            Ok((field.clone(), encode_value(field, value, scalar_type)?))
        })
        .collect()
}

/// Encodes one value as the given wire type.
pub fn encode_value(field: &str, value: &Value, scalar_type: ScalarType) -> Result<AttributeValue> {
    let mismatch = || RepositoryError::Encode {
        field: field.to_string(),
        reason: format!("cannot encode {:?} as {}", value, scalar_type.tag()),
    };

    match (scalar_type, value) {
        (ScalarType::String, Value::Str(s)) => Ok(AttributeValue::S(s.clone())),
        (ScalarType::String, Value::Int(n)) => Ok(AttributeValue::S(n.to_string())),
        (ScalarType::Number, value) => value
            .as_number()
            .map(|n| AttributeValue::N(n.to_string()))
            .ok_or_else(mismatch),
        (ScalarType::Binary, Value::Str(s)) => Ok(AttributeValue::B(s.clone())),
        (ScalarType::StringSet, Value::StrSet(set)) => Ok(AttributeValue::Ss(set.clone())),
        (ScalarType::StringSet, Value::IntSet(set)) => {
            Ok(AttributeValue::Ss(set.iter().map(i64::to_string).collect()))
        }
        (ScalarType::NumberSet, Value::IntSet(set)) => {
            Ok(AttributeValue::Ns(set.iter().map(i64::to_string).collect()))
        }
        (ScalarType::NumberSet, Value::StrSet(set)) => set
            .iter()
            .map(|s| {
                s.trim()
                    .parse::<i64>()
                    .map(|n| n.to_string())
                    .map_err(|_| mismatch())
            })
            .collect::<Result<Vec<_>>>()
            .map(AttributeValue::Ns),
        (ScalarType::BinarySet, Value::StrSet(set)) => Ok(AttributeValue::Bs(set.clone())),
        _ => Err(mismatch()),
    }
}

/// Builds the primary key of an entity from its attributes.
///
/// Every key field must hold a non-empty value.
pub fn encode_key(
    entity_type: &'static str,
    attributes: &Attributes,
    keys: &KeyFields,
    types: &BTreeMap<String, ScalarType>,
) -> Result<Key> {
    keys.iter()
        .map(|field| {
            let value = attributes
                .get(field)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| RepositoryError::MissingKey {
                    entity_type,
                    field: field.to_string(),
                })?;
            let scalar_type = types
                .get(field)
                .copied()
                .unwrap_or_else(|| implied_type(value));
            Ok((field.to_string(), encode_value(field, value, scalar_type)?))
        })
        .collect()
}

pub(crate) fn implied_type(value: &Value) -> ScalarType {
    match value {
        Value::Str(_) => ScalarType::String,
        Value::Int(_) => ScalarType::Number,
        Value::StrSet(_) => ScalarType::StringSet,
        Value::IntSet(_) => ScalarType::NumberSet,
    }
}

fn parse_number(field: &str, text: &str) -> std::result::Result<i64, DecodeError> {
    text.trim()
        .parse()
        .map_err(|_| DecodeError::InvalidNumber {
            field: field.to_string(),
            value: text.to_string(),
        })
}
