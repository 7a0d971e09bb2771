//! JSON output formatting.

use serde_json::{json, Map, Value as JsonValue};

use dynorm_core::model::{Registry, Value};
use dynorm_core::update::{UpdateAction, UpdatePlan};

/// Format a value as JSON.
pub fn format_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

fn attribute_json(value: &Value) -> JsonValue {
    match value {
        Value::Str(s) => json!(s),
        Value::Int(n) => json!(n),
        Value::StrSet(set) => json!(set),
        Value::IntSet(set) => json!(set),
    }
}

/// JSON form of an update plan: field to `{"action": ..., "value": ...}`.
pub fn plan_json(plan: &UpdatePlan) -> JsonValue {
    let actions: Map<String, JsonValue> = plan
        .iter()
        .map(|(field, action)| {
            let entry = match action {
                UpdateAction::Delete => json!({ "action": "DELETE" }),
                UpdateAction::AddNumeric(n) => json!({ "action": "ADD", "value": n }),
                UpdateAction::Replace(value) => {
                    json!({ "action": "PUT", "value": attribute_json(value) })
                }
            };
            (field.clone(), entry)
        })
        .collect();
    JsonValue::Object(actions)
}

/// JSON form of the registered entity types.
pub fn models_json(registry: &Registry) -> JsonValue {
    registry
        .iter()
        .map(|metadata| {
            let keys = metadata.primary_key_fields();
            let fields: Map<String, JsonValue> = metadata
                .rules
                .types
                .iter()
                .map(|(name, scalar_type)| (name.clone(), json!(scalar_type.tag())))
                .collect();
            json!({
                "entity_type": metadata.entity_type,
                "table_name": metadata.table_name,
                "hash_key": keys.hash_key,
                "range_key": keys.range_key,
                "fields": fields,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models;

    #[test]
    fn test_plan_json() {
        let plan = UpdatePlan::from([
            ("category".to_string(), UpdateAction::Delete),
            ("views".to_string(), UpdateAction::AddNumeric(3)),
            (
                "tags".to_string(),
                UpdateAction::Replace(Value::StrSet(vec!["a".to_string()])),
            ),
        ]);

        assert_eq!(
            plan_json(&plan),
            json!({
                "category": { "action": "DELETE" },
                "views": { "action": "ADD", "value": 3 },
                "tags": { "action": "PUT", "value": ["a"] },
            })
        );
    }

    #[test]
    fn test_models_json() {
        let registry = models::registry().unwrap();
        let models = models_json(&registry);

        assert_eq!(models[1]["entity_type"], "Project");
        assert_eq!(models[1]["range_key"], "pid");
        assert_eq!(models[1]["fields"]["views"], "N");
        assert_eq!(models[0]["range_key"], JsonValue::Null);
    }
}
