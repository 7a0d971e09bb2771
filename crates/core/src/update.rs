//! Diff-based planning of UpdateItem actions.

use std::collections::BTreeMap;

use crate::codec::{encode_value, implied_type};
use crate::model::{is_blank, Attributes, ScalarType, Value};
use crate::storage::{AttributeAction, AttributeValue, AttributeValueUpdate, Result};

/// A mutation to apply to one attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateAction {
    /// Remove the attribute.
    Delete,
    /// Atomically add to a numeric attribute (which starts from zero when unset).
    AddNumeric(i64),
    /// Overwrite the attribute.
    Replace(Value),
}

/// Actions keyed by field name.
pub type UpdatePlan = BTreeMap<String, UpdateAction>;

/// Computes the actions that bring the stored item from `snapshot` to `current`.
///
/// Per field, first match wins:
/// 1. now empty, was present: `Delete`
/// 2. now present and numeric, was empty: `AddNumeric`
/// 3. either side present: `Replace`
///
/// Fields empty on both sides produce no action. A numeric field that changes
/// in place is replaced, never incremented. Only fields declared `N` in `types`,
/// or not declared at all, are candidates for `AddNumeric`; text that happens to
/// parse as a number in any other field is replaced verbatim.
pub fn plan<'a>(
    current: &Attributes,
    snapshot: &Attributes,
    updatable_fields: impl IntoIterator<Item = &'a str>,
    types: &BTreeMap<String, ScalarType>,
) -> UpdatePlan {
    let mut actions = UpdatePlan::new();

    for field in updatable_fields {
        let was_blank = is_blank(snapshot, field);
        let countable = matches!(types.get(field), None | Some(ScalarType::Number));

        let action = match current.get(field).filter(|value| !value.is_empty()) {
            None if !was_blank => UpdateAction::Delete,
            None => continue,
            Some(value) => match value.as_number() {
                Some(n) if was_blank && countable => UpdateAction::AddNumeric(n),
                _ => UpdateAction::Replace(value.clone()),
            },
        };

        actions.insert(field.to_string(), action);
    }

    actions
}

/// Encodes a plan into `AttributeUpdates`, using each field's declared type.
pub fn encode_plan(
    plan: &UpdatePlan,
    types: &BTreeMap<String, ScalarType>,
) -> Result<BTreeMap<String, AttributeValueUpdate>> {
    plan.iter()
        .map(|(field, action)| {
            let scalar_type = types.get(field).copied();
            let update = match action {
                UpdateAction::Delete => AttributeValueUpdate {
                    action: AttributeAction::Delete,
                    value: None,
                },
                // ADD only applies to number attributes; others fall back to PUT.
                UpdateAction::AddNumeric(n) => match scalar_type {
                    None | Some(ScalarType::Number) => AttributeValueUpdate {
                        action: AttributeAction::Add,
                        value: Some(AttributeValue::N(n.to_string())),
                    },
                    Some(other) => AttributeValueUpdate {
                        action: AttributeAction::Put,
                        value: Some(encode_value(field, &Value::Int(*n), other)?),
                    },
                },
                UpdateAction::Replace(value) => AttributeValueUpdate {
                    action: AttributeAction::Put,
                    value: Some(encode_value(
                        field,
                        value,
                        scalar_type.unwrap_or_else(|| implied_type(value)),
                    )?),
                },
            };
            Ok((field.clone(), update))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, Value)]) -> Attributes {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_absent_to_numeric_adds() {
        let snapshot = attrs(&[("count", Value::from(""))]);
        let current = attrs(&[("count", Value::from("5"))]);

        let actions = plan(&current, &snapshot, ["count"], &BTreeMap::new());
        assert_eq!(actions["count"], UpdateAction::AddNumeric(5));
    }

    #[test]
    fn test_missing_to_integer_adds() {
        let current = attrs(&[("count", Value::Int(3))]);

        let actions = plan(&current, &Attributes::new(), ["count"], &BTreeMap::new());
        assert_eq!(actions["count"], UpdateAction::AddNumeric(3));
    }

    #[test]
    fn test_present_to_empty_deletes() {
        let snapshot = attrs(&[("tag", Value::from("x"))]);
        let current = attrs(&[("tag", Value::from(""))]);

        let actions = plan(&current, &snapshot, ["tag"], &BTreeMap::new());
        assert_eq!(actions["tag"], UpdateAction::Delete);
    }

    #[test]
    fn test_present_to_missing_deletes() {
        let snapshot = attrs(&[("tags", Value::from(vec!["a".to_string()]))]);

        let actions = plan(&Attributes::new(), &snapshot, ["tags"], &BTreeMap::new());
        assert_eq!(actions["tags"], UpdateAction::Delete);
    }

    #[test]
    fn test_numeric_changed_in_place_replaces() {
        let snapshot = attrs(&[("count", Value::from("5"))]);
        let current = attrs(&[("count", Value::from("7"))]);

        let actions = plan(&current, &snapshot, ["count"], &BTreeMap::new());
        assert_eq!(actions["count"], UpdateAction::Replace(Value::from("7")));
    }

    #[test]
    fn test_absent_to_text_replaces() {
        let current = attrs(&[("title", Value::from("hello"))]);

        let actions = plan(&current, &Attributes::new(), ["title"], &BTreeMap::new());
        assert_eq!(
            actions["title"],
            UpdateAction::Replace(Value::from("hello"))
        );
    }

    #[test]
    fn test_unchanged_present_value_is_replaced() {
        let both = attrs(&[("title", Value::from("same"))]);

        let actions = plan(&both, &both, ["title"], &BTreeMap::new());
        assert_eq!(actions["title"], UpdateAction::Replace(Value::from("same")));
    }

    #[test]
    fn test_both_empty_yields_nothing() {
        let snapshot = attrs(&[("tag", Value::from(""))]);

        let actions = plan(&Attributes::new(), &snapshot, ["tag", "other"], &BTreeMap::new());
        assert!(actions.is_empty());
    }

    #[test]
    fn test_only_updatable_fields_are_planned() {
        let current = attrs(&[("id", Value::from("k")), ("title", Value::from("t"))]);

        let actions = plan(&current, &Attributes::new(), ["title"], &BTreeMap::new());
        assert_eq!(actions.len(), 1);
        assert!(!actions.contains_key("id"));
    }

    #[test]
    fn test_encode_plan_actions() {
        let types = BTreeMap::from([
            ("count".to_string(), ScalarType::Number),
            ("title".to_string(), ScalarType::String),
        ]);
        let actions = UpdatePlan::from([
            ("count".to_string(), UpdateAction::AddNumeric(5)),
            ("title".to_string(), UpdateAction::Replace(Value::Int(9))),
            ("gone".to_string(), UpdateAction::Delete),
        ]);

        let updates = encode_plan(&actions, &types).unwrap();

        assert_eq!(
            updates["count"],
            AttributeValueUpdate {
                action: AttributeAction::Add,
                value: Some(AttributeValue::N("5".to_string())),
            }
        );
        assert_eq!(
            updates["title"],
            AttributeValueUpdate {
                action: AttributeAction::Put,
                value: Some(AttributeValue::S("9".to_string())),
            }
        );
        assert_eq!(
            updates["gone"],
            AttributeValueUpdate {
                action: AttributeAction::Delete,
                value: None,
            }
        );
    }

    #[test]
    fn test_encode_plan_add_on_string_field_is_put() {
        let types = BTreeMap::from([("code".to_string(), ScalarType::String)]);
        let actions = UpdatePlan::from([("code".to_string(), UpdateAction::AddNumeric(12))]);

        let updates = encode_plan(&actions, &types).unwrap();

        assert_eq!(updates["code"].action, AttributeAction::Put);
        assert_eq!(
            updates["code"].value,
            Some(AttributeValue::S("12".to_string()))
        );
    }

    #[test]
    fn test_numeric_text_in_string_field_is_kept_verbatim() {
        let types = BTreeMap::from([
            ("code".to_string(), ScalarType::String),
            ("count".to_string(), ScalarType::Number),
        ]);
        let current = attrs(&[
            ("code", Value::from("007")),
            ("count", Value::from("007")),
        ]);

        let actions = plan(&current, &Attributes::new(), ["code", "count"], &types);
        assert_eq!(actions["code"], UpdateAction::Replace(Value::from("007")));
        assert_eq!(actions["count"], UpdateAction::AddNumeric(7));

        let updates = encode_plan(&actions, &types).unwrap();
        assert_eq!(updates["code"].action, AttributeAction::Put);
        assert_eq!(
            updates["code"].value,
            Some(AttributeValue::S("007".to_string()))
        );
        assert_eq!(updates["count"].action, AttributeAction::Add);
    }

    #[test]
    fn test_padded_numeric_text_in_string_field_is_kept_verbatim() {
        let types = BTreeMap::from([("code".to_string(), ScalarType::String)]);

        for text in ["+5", " 42 "] {
            let current = attrs(&[("code", Value::from(text))]);
            let actions = plan(&current, &Attributes::new(), ["code"], &types);
            assert_eq!(actions["code"], UpdateAction::Replace(Value::from(text)));
        }
    }
}
