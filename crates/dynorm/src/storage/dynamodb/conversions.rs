//! Conversion between wire types and `aws-sdk-dynamodb` types.
//!
//! Pure functions, testable without DynamoDB access. Binary values travel as
//! base64 strings on the wire and as raw bytes in the SDK.

use std::collections::HashMap;

use aws_sdk_dynamodb::primitives::Blob;
use aws_sdk_dynamodb::types::{
    AttributeAction as SdkAttributeAction, AttributeValue as SdkAttributeValue,
    AttributeValueUpdate as SdkAttributeValueUpdate, ComparisonOperator as SdkComparisonOperator,
    Condition as SdkCondition,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use dynorm_core::storage::{
    AttributeAction, AttributeValue, AttributeValueUpdate, ComparisonOperator, Condition,
};

pub type SdkItem = HashMap<String, SdkAttributeValue>;

/// Converts a wire value into an SDK value.
pub fn to_sdk_value(value: &AttributeValue) -> Result<SdkAttributeValue, String> {
    Ok(match value {
        AttributeValue::S(s) => SdkAttributeValue::S(s.clone()),
        AttributeValue::N(n) => SdkAttributeValue::N(n.clone()),
        AttributeValue::B(b) => SdkAttributeValue::B(decode_blob(b)?),
        AttributeValue::Ss(set) => SdkAttributeValue::Ss(set.clone()),
        AttributeValue::Ns(set) => SdkAttributeValue::Ns(set.clone()),
        AttributeValue::Bs(set) => SdkAttributeValue::Bs(
            set.iter()
                .map(|b| decode_blob(b))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        AttributeValue::Bool(b) => SdkAttributeValue::Bool(*b),
        AttributeValue::Null(b) => SdkAttributeValue::Null(*b),
        AttributeValue::M(map) => SdkAttributeValue::M(to_sdk_item(map)?),
        AttributeValue::L(list) => SdkAttributeValue::L(
            list.iter()
                .map(to_sdk_value)
                .collect::<Result<Vec<_>, _>>()?,
        ),
    })
}

/// Converts an SDK value into a wire value.
pub fn from_sdk_value(value: SdkAttributeValue) -> Result<AttributeValue, String> {
    Ok(match value {
        SdkAttributeValue::S(s) => AttributeValue::S(s),
        SdkAttributeValue::N(n) => AttributeValue::N(n),
        SdkAttributeValue::B(b) => AttributeValue::B(BASE64.encode(b.as_ref())),
        SdkAttributeValue::Ss(set) => AttributeValue::Ss(set),
        SdkAttributeValue::Ns(set) => AttributeValue::Ns(set),
        SdkAttributeValue::Bs(set) => {
            AttributeValue::Bs(set.iter().map(|b| BASE64.encode(b.as_ref())).collect())
        }
        SdkAttributeValue::Bool(b) => AttributeValue::Bool(b),
        SdkAttributeValue::Null(b) => AttributeValue::Null(b),
        SdkAttributeValue::M(map) => AttributeValue::M(from_sdk_item(map)?),
        SdkAttributeValue::L(list) => AttributeValue::L(
            list.into_iter()
                .map(from_sdk_value)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        other => return Err(format!("Unsupported attribute value: {:?}", other)),
    })
}

/// Converts a wire item (or key) into an SDK item.
pub fn to_sdk_item(item: &HashMap<String, AttributeValue>) -> Result<SdkItem, String> {
    item.iter()
        .map(|(name, value)| Ok((name.clone(), to_sdk_value(value)?)))
        .collect()
}

/// Converts an SDK item (or key) into a wire item.
pub fn from_sdk_item(item: SdkItem) -> Result<HashMap<String, AttributeValue>, String> {
    item.into_iter()
        .map(|(name, value)| Ok((name, from_sdk_value(value)?)))
        .collect()
}

/// Converts a filter or key condition.
pub fn to_sdk_condition(condition: &Condition) -> Result<SdkCondition, String> {
    let operands = condition
        .attribute_value_list
        .iter()
        .map(to_sdk_value)
        .collect::<Result<Vec<_>, _>>()?;

    SdkCondition::builder()
        .comparison_operator(to_sdk_operator(condition.comparison_operator))
        .set_attribute_value_list((!operands.is_empty()).then_some(operands))
        .build()
        .map_err(|e| format!("Invalid condition: {}", e))
}

/// Converts one `AttributeUpdates` entry.
pub fn to_sdk_update(update: &AttributeValueUpdate) -> Result<SdkAttributeValueUpdate, String> {
    let value = update.value.as_ref().map(to_sdk_value).transpose()?;
    let action = match update.action {
        AttributeAction::Put => SdkAttributeAction::Put,
        AttributeAction::Add => SdkAttributeAction::Add,
        AttributeAction::Delete => SdkAttributeAction::Delete,
    };

    Ok(SdkAttributeValueUpdate::builder()
        .action(action)
        .set_value(value)
        .build())
}

/// Converts a page size to the SDK's `Limit`, rejecting sizes it cannot carry.
pub fn to_sdk_limit(limit: Option<u32>) -> Result<Option<i32>, String> {
    limit
        .map(|limit| {
            i32::try_from(limit).map_err(|_| format!("Limit {} is out of range", limit))
        })
        .transpose()
}

fn to_sdk_operator(operator: ComparisonOperator) -> SdkComparisonOperator {
    match operator {
        ComparisonOperator::Eq => SdkComparisonOperator::Eq,
        ComparisonOperator::Ne => SdkComparisonOperator::Ne,
        ComparisonOperator::Le => SdkComparisonOperator::Le,
        ComparisonOperator::Lt => SdkComparisonOperator::Lt,
        ComparisonOperator::Ge => SdkComparisonOperator::Ge,
        ComparisonOperator::Gt => SdkComparisonOperator::Gt,
        ComparisonOperator::NotNull => SdkComparisonOperator::NotNull,
        ComparisonOperator::Null => SdkComparisonOperator::Null,
        ComparisonOperator::Contains => SdkComparisonOperator::Contains,
        ComparisonOperator::NotContains => SdkComparisonOperator::NotContains,
        ComparisonOperator::BeginsWith => SdkComparisonOperator::BeginsWith,
        ComparisonOperator::In => SdkComparisonOperator::In,
        ComparisonOperator::Between => SdkComparisonOperator::Between,
    }
}

fn decode_blob(encoded: &str) -> Result<Blob, String> {
    BASE64
        .decode(encoded)
        .map(Blob::new)
        .map_err(|e| format!("Invalid base64 binary value: {}", e))
}
