//! Command execution against the application state.

use anyhow::{Context, Result};
use uuid::Uuid;

use dynorm_core::model::{Model, ScalarType, Value};
use dynorm_core::repository::Record;

use crate::cli::{assignments_to_attributes, parse_value, Commands, OutputFormat};
use crate::models::Project;
use crate::output::{format_output, json, pretty};
use crate::state::AppState;

fn projects_output(records: Vec<Record<Project>>, format: OutputFormat) -> String {
    let projects: Vec<Project> = records.into_iter().map(Record::into_inner).collect();
    match format {
        OutputFormat::Json => format_output(&projects, format),
        OutputFormat::Pretty => pretty::format_projects(&projects),
    }
}

fn project_output(project: &Project, label: Option<&str>, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => format_output(project, format),
        OutputFormat::Pretty => match label {
            Some(label) => format!("{}:\n{}", label, pretty::format_project(project)),
            None => pretty::format_project(project),
        },
    }
}

async fn load(state: &AppState, cid: &str, pid: &str) -> Result<Record<Project>> {
    state
        .projects
        .find_one(cid, Some(Value::from(pid)))
        .await?
        .with_context(|| format!("Project {}/{} not found", cid, pid))
}

/// Runs one command and returns the text to print, which is empty when there
/// is nothing to say.
pub async fn run(
    command: Commands,
    state: &AppState,
    format: OutputFormat,
    quiet: bool,
) -> Result<String> {
    let output = match command {
        Commands::Models => match format {
            OutputFormat::Json => format_output(&json::models_json(&state.registry), format),
            OutputFormat::Pretty => pretty::format_models(&state.registry),
        },
        Commands::List { cid } => {
            let records = match cid {
                Some(cid) => state.projects.find_all_by_hash_key(cid).await?,
                None => state.projects.find_all().await?,
            };
            projects_output(records, format)
        }
        Commands::Get { cid, pid } => {
            let record = load(state, &cid, &pid).await?;
            project_output(&record, None, format)
        }
        Commands::Find { field, op, values } => {
            let scalar_type = Project::field_type(&field).unwrap_or(ScalarType::String);
            let values = values
                .iter()
                .map(|raw| parse_value(&field, raw, scalar_type))
                .collect::<Result<Vec<_>, _>>()?;
            let records = state
                .projects
                .find_all_by(&field, op.into(), &values)
                .await?;
            projects_output(records, format)
        }
        Commands::Create {
            cid,
            pid,
            title,
            category,
            start,
            end,
            tags,
        } => {
            let project = Project {
                cid,
                pid: pid.unwrap_or_else(|| Uuid::new_v4().to_string()),
                title,
                category,
                start,
                end,
                views: None,
                tags,
            };
            state.projects.validate(&project)?;

            let mut record = Record::new(project);
            state.projects.save(&mut record).await?;
            project_output(&record, Some("Created"), format)
        }
        Commands::Set {
            cid,
            pid,
            assignments,
        } => {
            let changes = assignments_to_attributes::<Project>(&assignments)?;
            let mut record = load(state, &cid, &pid).await?;
            record.set_attributes(changes)?;
            state.projects.validate(&record)?;

            let plan = state.projects.update(&mut record).await?;
            match format {
                OutputFormat::Json => format_output(
                    &serde_json::json!({
                        "project": &*record,
                        "actions": json::plan_json(&plan),
                    }),
                    format,
                ),
                OutputFormat::Pretty => format!(
                    "{}\n{}",
                    project_output(&record, Some("Updated"), format),
                    pretty::format_plan(&plan)
                ),
            }
        }
        Commands::Delete { cid, pid } => {
            let record = load(state, &cid, &pid).await?;
            state.projects.delete(&record).await?;
            match format {
                OutputFormat::Json => format_output(&*record, format),
                OutputFormat::Pretty if quiet => String::new(),
                OutputFormat::Pretty => format!("Deleted project {}/{}", cid, pid),
            }
        }
    };

    Ok(output)
}
