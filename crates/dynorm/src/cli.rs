//! CLI command definitions and argument parsing.

use std::str::FromStr;

use clap::{Parser, Subcommand, ValueEnum};
use thiserror::Error;

use dynorm_core::model::{Attributes, Model, ScalarType, Value};
use dynorm_core::storage::ComparisonOperator;

use crate::config::Config;

/// Errors from interpreting command-line values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CliError {
    #[error("Invalid assignment '{0}', expected field=value")]
    InvalidAssignment(String),

    #[error("Unknown field '{field}' for {entity_type}")]
    UnknownField {
        entity_type: &'static str,
        field: String,
    },

    #[error("Field '{0}' is part of the key and cannot be changed")]
    KeyField(String),

    #[error("Invalid number '{value}' for field '{field}'")]
    InvalidNumber { field: String, value: String },
}

/// Active-record data-mapper for DynamoDB-compatible stores.
#[derive(Debug, Parser)]
#[command(name = "dynorm")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Table name prefix (overrides DYNORM_TABLE_PREFIX).
    #[arg(long)]
    pub table_prefix: Option<String>,

    /// Items per query/scan page (overrides DYNORM_PAGE_SIZE).
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Output format.
    #[arg(long, default_value = "pretty")]
    pub format: OutputFormat,

    /// Suppress non-essential output.
    #[arg(long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Environment configuration with command-line overrides applied.
    pub fn config(&self) -> Config {
        let mut config = Config::from_env();
        if let Some(prefix) = &self.table_prefix {
            config.table_prefix = prefix.clone();
        }
        if let Some(page_size) = self.page_size.filter(|size| *size > 0) {
            config.page_size = Some(page_size);
        }
        config
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

/// Available commands. Entity commands operate on projects.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List registered entity types.
    Models,
    /// List projects, optionally only those of one client.
    List {
        /// Client id (hash key).
        #[arg(long)]
        cid: Option<String>,
    },
    /// Get a project by key.
    Get {
        /// Client id (hash key).
        cid: String,
        /// Project id (range key).
        pid: String,
    },
    /// Find projects by scanning with a filter on one attribute.
    Find {
        /// Attribute name.
        field: String,
        /// Comparison operator.
        #[arg(value_enum)]
        op: Comparison,
        /// Operands, typed after the attribute's declared type.
        values: Vec<String>,
    },
    /// Create a project.
    Create {
        /// Client id (hash key).
        #[arg(long)]
        cid: String,
        /// Project id (range key); generated when omitted.
        #[arg(long)]
        pid: Option<String>,
        /// Project title.
        #[arg(long)]
        title: String,
        /// Category.
        #[arg(long)]
        category: Option<String>,
        /// Start date (YYYY-MM-DD).
        #[arg(long)]
        start: Option<String>,
        /// End date (YYYY-MM-DD).
        #[arg(long)]
        end: Option<String>,
        /// Comma-separated tags.
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
    },
    /// Change project attributes and send only the difference.
    Set {
        /// Client id (hash key).
        cid: String,
        /// Project id (range key).
        pid: String,
        /// Assignments as field=value; an empty value removes the attribute.
        #[arg(required = true)]
        assignments: Vec<Assignment>,
    },
    /// Delete a project.
    Delete {
        /// Client id (hash key).
        cid: String,
        /// Project id (range key).
        pid: String,
    },
}

/// Comparison operators accepted by `find`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Comparison {
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

impl From<Comparison> for ComparisonOperator {
    fn from(comparison: Comparison) -> Self {
        match comparison {
            Comparison::Eq => ComparisonOperator::Eq,
            Comparison::Ne => ComparisonOperator::Ne,
            Comparison::Le => ComparisonOperator::Le,
            Comparison::Lt => ComparisonOperator::Lt,
            Comparison::Ge => ComparisonOperator::Ge,
            Comparison::Gt => ComparisonOperator::Gt,
            Comparison::NotNull => ComparisonOperator::NotNull,
            Comparison::Null => ComparisonOperator::Null,
            Comparison::Contains => ComparisonOperator::Contains,
            Comparison::NotContains => ComparisonOperator::NotContains,
            Comparison::BeginsWith => ComparisonOperator::BeginsWith,
            Comparison::In => ComparisonOperator::In,
            Comparison::Between => ComparisonOperator::Between,
        }
    }
}

/// A `field=value` pair from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub field: String,
    pub raw: String,
}

impl FromStr for Assignment {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((field, raw)) if !field.trim().is_empty() => Ok(Self {
                field: field.trim().to_string(),
                raw: raw.to_string(),
            }),
            _ => Err(CliError::InvalidAssignment(s.to_string())),
        }
    }
}

/// Parses a raw command-line value as the given type.
///
/// Sets are comma-separated. An empty string stays an empty string, which the
/// mapper treats as absent.
pub fn parse_value(field: &str, raw: &str, scalar_type: ScalarType) -> Result<Value, CliError> {
    if raw.is_empty() {
        return Ok(Value::Str(String::new()));
    }

    let number = |text: &str| {
        text.trim()
            .parse::<i64>()
            .map_err(|_| CliError::InvalidNumber {
                field: field.to_string(),
                value: text.to_string(),
            })
    };
    let members = || raw.split(',').map(str::trim).filter(|m| !m.is_empty());

    Ok(match scalar_type {
        ScalarType::String | ScalarType::Binary => Value::Str(raw.to_string()),
        ScalarType::Number => Value::Int(number(raw)?),
        ScalarType::StringSet | ScalarType::BinarySet => {
            Value::StrSet(members().map(str::to_string).collect())
        }
        ScalarType::NumberSet => Value::IntSet(members().map(number).collect::<Result<_, _>>()?),
    })
}

/// Turns assignments into attributes of `M`, rejecting unknown and key fields.
pub fn assignments_to_attributes<M: Model>(
    assignments: &[Assignment],
) -> Result<Attributes, CliError> {
    let keys = M::primary_key_fields();

    assignments
        .iter()
        .map(|assignment| {
            if keys.contains(&assignment.field) {
                return Err(CliError::KeyField(assignment.field.clone()));
            }
            let scalar_type =
                M::field_type(&assignment.field).ok_or_else(|| CliError::UnknownField {
                    entity_type: M::ENTITY_TYPE,
                    field: assignment.field.clone(),
                })?;
            Ok((
                assignment.field.clone(),
                parse_value(&assignment.field, &assignment.raw, scalar_type)?,
            ))
        })
        .collect()
}
