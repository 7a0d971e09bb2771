//! Pretty output formatting.

use dynorm_core::model::{Registry, Value};
use dynorm_core::update::{UpdateAction, UpdatePlan};

use crate::models::Project;

fn format_value(value: &Value) -> String {
    match value {
        Value::Str(s) => s.clone(),
        Value::Int(n) => n.to_string(),
        Value::StrSet(set) => format!("[{}]", set.join(", ")),
        Value::IntSet(set) => format!(
            "[{}]",
            set.iter().map(i64::to_string).collect::<Vec<_>>().join(", ")
        ),
    }
}

/// Format a project for display.
pub fn format_project(project: &Project) -> String {
    let mut output = format!(
        "{}\n  Key: {} / {}",
        project.title, project.cid, project.pid
    );
    if let Some(category) = &project.category {
        output.push_str(&format!("\n  Category: {}", category));
    }
    match (&project.start, &project.end) {
        (Some(start), Some(end)) => output.push_str(&format!("\n  Dates: {} to {}", start, end)),
        (Some(start), None) => output.push_str(&format!("\n  Starts: {}", start)),
        (None, Some(end)) => output.push_str(&format!("\n  Ends: {}", end)),
        (None, None) => {}
    }
    if let Some(views) = project.views {
        output.push_str(&format!("\n  Views: {}", views));
    }
    if !project.tags.is_empty() {
        output.push_str(&format!("\n  Tags: {}", project.tags.join(", ")));
    }
    output
}

/// Format projects for display.
pub fn format_projects(projects: &[Project]) -> String {
    if projects.is_empty() {
        return "No projects found.".to_string();
    }
    let mut output = format!("PROJECTS ({})\n", projects.len());
    output.push_str(&"-".repeat(40));
    for project in projects {
        output.push_str(&format!("\n{}", format_project(project)));
        output.push('\n');
    }
    output
}

/// Format the registered entity types for display.
pub fn format_models(registry: &Registry) -> String {
    let mut output = format!("MODELS ({})\n", registry.len());
    output.push_str(&"-".repeat(40));
    for metadata in registry.iter() {
        let keys = metadata.primary_key_fields();
        output.push_str(&format!(
            "\n{} (table: {})\n  Hash key: {}",
            metadata.entity_type, metadata.table_name, keys.hash_key
        ));
        if let Some(range_key) = &keys.range_key {
            output.push_str(&format!("\n  Range key: {}", range_key));
        }
        let fields: Vec<_> = metadata
            .rules
            .types
            .iter()
            .map(|(name, scalar_type)| format!("{}:{}", name, scalar_type.tag()))
            .collect();
        output.push_str(&format!("\n  Fields: {}\n", fields.join(", ")));
    }
    output
}

/// Format an update plan for display.
pub fn format_plan(plan: &UpdatePlan) -> String {
    if plan.is_empty() {
        return "No changes.".to_string();
    }
    plan.iter()
        .map(|(field, action)| match action {
            UpdateAction::Delete => format!("  DELETE {}", field),
            UpdateAction::AddNumeric(n) => format!("  ADD    {} += {}", field, n),
            UpdateAction::Replace(value) => format!("  PUT    {} = {}", field, format_value(value)),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
