//! Typed application-side attribute values.

use std::collections::BTreeMap;

use crate::storage::{RepositoryError, Result};

/// An entity's attributes: field name to typed value.
pub type Attributes = BTreeMap<String, Value>;

/// A typed attribute value as seen by application code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Str(String),
    Int(i64),
    StrSet(Vec<String>),
    IntSet(Vec<i64>),
}

impl Value {
    /// Empty strings and empty sets count as absent. Integers are never empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Str(s) => s.is_empty(),
            Value::Int(_) => false,
            Value::StrSet(set) => set.is_empty(),
            Value::IntSet(set) => set.is_empty(),
        }
    }

    /// Returns the integer this value represents, if any.
    ///
    /// Strings holding an integer literal are numeric too.
    pub fn as_number(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Str(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<Vec<String>> for Value {
    fn from(value: Vec<String>) -> Self {
        Value::StrSet(value)
    }
}

impl From<Vec<i64>> for Value {
    fn from(value: Vec<i64>) -> Self {
        Value::IntSet(value)
    }
}

/// True when `field` is absent or holds an empty value.
pub fn is_blank(attributes: &Attributes, field: &str) -> bool {
    attributes.get(field).is_none_or(Value::is_empty)
}

// ============================================================================
// Mapping helpers for `Model::from_attributes`
// ============================================================================

/// Get a required, non-empty string attribute.
pub fn get_string(attributes: &Attributes, key: &str) -> Result<String> {
    get_optional_string(attributes, key)
        .ok_or_else(|| RepositoryError::InvalidData(format!("Missing or invalid field: {}", key)))
}

/// Get an optional string attribute. Integers are rendered as text.
pub fn get_optional_string(attributes: &Attributes, key: &str) -> Option<String> {
    match attributes.get(key)? {
        Value::Str(s) if !s.is_empty() => Some(s.clone()),
        Value::Int(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Get an optional integer attribute.
pub fn get_optional_int(attributes: &Attributes, key: &str) -> Result<Option<i64>> {
    match attributes.get(key) {
        None => Ok(None),
        Some(value) if value.is_empty() => Ok(None),
        Some(value) => value.as_number().map(Some).ok_or_else(|| {
            RepositoryError::InvalidData(format!("Field {} is not a number", key))
        }),
    }
}

/// Get a string set attribute, empty when absent.
pub fn get_string_set(attributes: &Attributes, key: &str) -> Result<Vec<String>> {
    match attributes.get(key) {
        None => Ok(Vec::new()),
        Some(value) if value.is_empty() => Ok(Vec::new()),
        Some(Value::StrSet(set)) => Ok(set.clone()),
        Some(Value::IntSet(set)) => Ok(set.iter().map(i64::to_string).collect()),
        Some(_) => Err(RepositoryError::InvalidData(format!(
            "Field {} is not a string set",
            key
        ))),
    }
}

/// Get an integer set attribute, empty when absent.
pub fn get_int_set(attributes: &Attributes, key: &str) -> Result<Vec<i64>> {
    match attributes.get(key) {
        None => Ok(Vec::new()),
        Some(value) if value.is_empty() => Ok(Vec::new()),
        Some(Value::IntSet(set)) => Ok(set.clone()),
        Some(_) => Err(RepositoryError::InvalidData(format!(
            "Field {} is not a number set",
            key
        ))),
    }
}

/// Insert `value` unless it is empty.
pub fn insert_present(attributes: &mut Attributes, key: &str, value: impl Into<Value>) {
    let value = value.into();
    if !value.is_empty() {
        attributes.insert(key.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emptiness() {
        assert!(Value::Str(String::new()).is_empty());
        assert!(Value::StrSet(vec![]).is_empty());
        assert!(Value::IntSet(vec![]).is_empty());
        assert!(!Value::Int(0).is_empty());
        assert!(!Value::Str("x".to_string()).is_empty());
    }

    #[test]
    fn test_numeric_strings() {
        assert_eq!(Value::Str("5".to_string()).as_number(), Some(5));
        assert_eq!(Value::Str("-12".to_string()).as_number(), Some(-12));
        assert_eq!(Value::Str("abc".to_string()).as_number(), None);
        assert_eq!(Value::Str(String::new()).as_number(), None);
        assert_eq!(Value::StrSet(vec!["1".to_string()]).as_number(), None);
    }

    #[test]
    fn test_is_blank() {
        let mut attributes = Attributes::new();
        attributes.insert("tag".to_string(), Value::from(""));
        attributes.insert("count".to_string(), Value::Int(0));

        assert!(is_blank(&attributes, "tag"));
        assert!(is_blank(&attributes, "missing"));
        assert!(!is_blank(&attributes, "count"));
    }

    #[test]
    fn test_get_string_missing_field() {
        let attributes = Attributes::new();
        assert!(get_string(&attributes, "missing").is_err());
    }

    #[test]
    fn test_get_optional_int_rejects_text() {
        let mut attributes = Attributes::new();
        attributes.insert("views".to_string(), Value::from("many"));
        assert!(get_optional_int(&attributes, "views").is_err());

        attributes.insert("views".to_string(), Value::from("12"));
        assert_eq!(get_optional_int(&attributes, "views").unwrap(), Some(12));
    }

    #[test]
    fn test_insert_present_skips_empty() {
        let mut attributes = Attributes::new();
        insert_present(&mut attributes, "title", "");
        insert_present(&mut attributes, "tags", Vec::<String>::new());
        insert_present(&mut attributes, "views", 3_i64);

        assert_eq!(attributes.len(), 1);
        assert_eq!(attributes.get("views"), Some(&Value::Int(3)));
    }
}
