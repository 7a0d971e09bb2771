//! Wire-level types exchanged with the key-value store.
//!
//! These mirror the DynamoDB JSON protocol: every attribute value is a
//! single-key object whose key is the type tag (`{"S": "..."}`,
//! `{"NS": ["1", "2"]}`), and request/response bodies use PascalCase field
//! names.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::error::{DecodeError, RepositoryError, Result};

/// A stored item: attribute name to tagged value.
pub type Item = HashMap<String, AttributeValue>;

/// A primary key (or continuation token): key attribute name to tagged value.
pub type Key = HashMap<String, AttributeValue>;

/// A tagged attribute value as it travels over the wire.
///
/// Numbers are carried as strings, following the store's textual-number
/// convention. Binary values are base64 strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeValue {
    #[serde(rename = "S")]
    S(String),
    #[serde(rename = "N")]
    N(String),
    #[serde(rename = "B")]
    B(String),
    #[serde(rename = "SS")]
    Ss(Vec<String>),
    #[serde(rename = "NS")]
    Ns(Vec<String>),
    #[serde(rename = "BS")]
    Bs(Vec<String>),
    #[serde(rename = "BOOL")]
    Bool(bool),
    #[serde(rename = "NULL")]
    Null(bool),
    #[serde(rename = "M")]
    M(HashMap<String, AttributeValue>),
    #[serde(rename = "L")]
    L(Vec<AttributeValue>),
}

impl AttributeValue {
    /// Returns the wire type tag of this value.
    pub fn tag(&self) -> &'static str {
        match self {
            AttributeValue::S(_) => "S",
            AttributeValue::N(_) => "N",
            AttributeValue::B(_) => "B",
            AttributeValue::Ss(_) => "SS",
            AttributeValue::Ns(_) => "NS",
            AttributeValue::Bs(_) => "BS",
            AttributeValue::Bool(_) => "BOOL",
            AttributeValue::Null(_) => "NULL",
            AttributeValue::M(_) => "M",
            AttributeValue::L(_) => "L",
        }
    }
}

/// Comparison operators accepted by scan filters and key conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComparisonOperator {
    Eq,
    Ne,
    Le,
    Lt,
    Ge,
    Gt,
    NotNull,
    Null,
    Contains,
    NotContains,
    BeginsWith,
    In,
    Between,
}

impl ComparisonOperator {
    /// Checks that `count` operands are acceptable for this operator.
    pub fn accepts_operands(&self, count: usize) -> bool {
        match self {
            ComparisonOperator::NotNull | ComparisonOperator::Null => count == 0,
            ComparisonOperator::Between => count == 2,
            ComparisonOperator::In => count >= 1,
            _ => count == 1,
        }
    }

    /// Returns the operator name as used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOperator::Eq => "EQ",
            ComparisonOperator::Ne => "NE",
            ComparisonOperator::Le => "LE",
            ComparisonOperator::Lt => "LT",
            ComparisonOperator::Ge => "GE",
            ComparisonOperator::Gt => "GT",
            ComparisonOperator::NotNull => "NOT_NULL",
            ComparisonOperator::Null => "NULL",
            ComparisonOperator::Contains => "CONTAINS",
            ComparisonOperator::NotContains => "NOT_CONTAINS",
            ComparisonOperator::BeginsWith => "BEGINS_WITH",
            ComparisonOperator::In => "IN",
            ComparisonOperator::Between => "BETWEEN",
        }
    }
}

/// A single filter or key condition on one attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Condition {
    pub comparison_operator: ComparisonOperator,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attribute_value_list: Vec<AttributeValue>,
}

impl Condition {
    /// Creates a condition, rejecting an operand count the operator does not take.
    pub fn new(
        comparison_operator: ComparisonOperator,
        attribute_value_list: Vec<AttributeValue>,
    ) -> Result<Self> {
        if !comparison_operator.accepts_operands(attribute_value_list.len()) {
            return Err(RepositoryError::InvalidData(format!(
                "{} does not accept {} operand(s)",
                comparison_operator.as_str(),
                attribute_value_list.len()
            )));
        }
        Ok(Self {
            comparison_operator,
            attribute_value_list,
        })
    }

    /// Equality condition on one value.
    pub fn equals(value: AttributeValue) -> Self {
        Self {
            comparison_operator: ComparisonOperator::Eq,
            attribute_value_list: vec![value],
        }
    }

    /// Attribute-exists condition.
    pub fn not_null() -> Self {
        Self {
            comparison_operator: ComparisonOperator::NotNull,
            attribute_value_list: Vec::new(),
        }
    }
}

/// Per-attribute action sent with an UpdateItem request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AttributeAction {
    Put,
    Add,
    Delete,
}

/// One entry of an UpdateItem `AttributeUpdates` map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AttributeValueUpdate {
    pub action: AttributeAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<AttributeValue>,
}

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetItemRequest {
    pub table_name: String,
    pub key: Key,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutItemRequest {
    pub table_name: String,
    pub item: Item,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateItemRequest {
    pub table_name: String,
    pub key: Key,
    pub attribute_updates: BTreeMap<String, AttributeValueUpdate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteItemRequest {
    pub table_name: String,
    pub key: Key,
}

/// A query scoped to one hash key value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryRequest {
    pub table_name: String,
    pub key_conditions: BTreeMap<String, Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_start_key: Option<Key>,
}

/// A full-table read, optionally filtered per attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScanRequest {
    pub table_name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub scan_filter: BTreeMap<String, Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_start_key: Option<Key>,
}

// ============================================================================
// Responses
// ============================================================================

/// Decoded body of a store response.
///
/// Success bodies fill the item fields; failure bodies carry `message`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResponseBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<Item>,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_evaluated_key: Option<Key>,
    #[serde(
        default,
        rename = "message",
        alias = "Message",
        skip_serializing_if = "Option::is_none"
    )]
    pub message: Option<String>,
}

/// The outcome of one store call: a success flag and a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreResponse {
    pub ok: bool,
    pub body: ResponseBody,
}

impl StoreResponse {
    /// A successful response with the given body.
    pub fn success(body: ResponseBody) -> Self {
        Self { ok: true, body }
    }

    /// A successful response with an empty body.
    pub fn empty() -> Self {
        Self::success(ResponseBody::default())
    }

    /// A failed response carrying a human-readable message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            body: ResponseBody {
                message: Some(message.into()),
                ..ResponseBody::default()
            },
        }
    }

    /// Builds a response from a raw JSON body as returned by the store.
    pub fn from_json(ok: bool, body: &str) -> std::result::Result<Self, DecodeError> {
        let body = serde_json::from_str(body).map_err(|e| DecodeError::Body(e.to_string()))?;
        Ok(Self { ok, body })
    }

    /// Returns the body, or a `StoreRequest` error when the call failed.
    pub fn into_body(self) -> Result<ResponseBody> {
        if self.ok {
            Ok(self.body)
        } else {
            Err(RepositoryError::StoreRequest {
                message: self
                    .body
                    .message
                    .unwrap_or_else(|| "store request failed".to_string()),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_value_json_uses_type_tags() {
        let value = AttributeValue::Ns(vec!["1".to_string(), "2".to_string()]);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"{"NS":["1","2"]}"#);

        let parsed: AttributeValue = serde_json::from_str(r#"{"S":"hello"}"#).unwrap();
        assert_eq!(parsed, AttributeValue::S("hello".to_string()));
    }

    #[test]
    fn test_unknown_tag_is_rejected() {
        let parsed = serde_json::from_str::<AttributeValue>(r#"{"X":"hello"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_operand_counts() {
        assert!(ComparisonOperator::NotNull.accepts_operands(0));
        assert!(!ComparisonOperator::NotNull.accepts_operands(1));
        assert!(ComparisonOperator::Between.accepts_operands(2));
        assert!(!ComparisonOperator::Between.accepts_operands(1));
        assert!(ComparisonOperator::In.accepts_operands(3));
        assert!(!ComparisonOperator::Eq.accepts_operands(2));
    }

    #[test]
    fn test_condition_new_rejects_bad_arity() {
        let result = Condition::new(ComparisonOperator::Eq, vec![]);
        assert!(matches!(result, Err(RepositoryError::InvalidData(_))));
    }

    #[test]
    fn test_response_from_json_success() {
        let response = StoreResponse::from_json(
            true,
            r#"{"Items":[{"id":{"S":"a"}}],"Count":1,"LastEvaluatedKey":{"id":{"S":"a"}}}"#,
        )
        .unwrap();

        let body = response.into_body().unwrap();
        assert_eq!(body.count, 1);
        assert_eq!(body.items.len(), 1);
        assert!(body.last_evaluated_key.is_some());
    }

    #[test]
    fn test_response_from_json_failure_carries_message() {
        let response = StoreResponse::from_json(
            false,
            r#"{"__type":"ResourceNotFoundException","message":"Requested resource not found"}"#,
        )
        .unwrap();

        assert_eq!(
            response.into_body(),
            Err(RepositoryError::StoreRequest {
                message: "Requested resource not found".to_string()
            })
        );
    }

    #[test]
    fn test_update_serializes_actions_uppercase() {
        let update = AttributeValueUpdate {
            action: AttributeAction::Delete,
            value: None,
        };
        assert_eq!(serde_json::to_string(&update).unwrap(), r#"{"Action":"DELETE"}"#);
    }
}
