use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use dynorm_core::model::{
    get_optional_int, get_optional_string, get_string, get_string_set, insert_present,
    Attributes, Model, Rules, ScalarType,
};
use dynorm_core::storage::Result;

/// Date format of `start` and `end`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A project, stored in the `project` table under client id and project id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub cid: String,
    pub pid: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Project {
    pub fn new(cid: impl Into<String>, pid: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            cid: cid.into(),
            pid: pid.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_dates(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start = Some(start.into());
        self.end = Some(end.into());
        self
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|tag| tag.to_string()).collect();
        self
    }
}

fn parse_date(value: Option<&str>) -> std::result::Result<Option<NaiveDate>, chrono::ParseError> {
    value
        .map(|date| NaiveDate::parse_from_str(date, DATE_FORMAT))
        .transpose()
}

impl Model for Project {
    const ENTITY_TYPE: &'static str = "Project";

    fn table_name() -> &'static str {
        "project"
    }

    fn rules() -> Rules {
        Rules::new("cid")
            .with_range_key("pid")
            .field("cid", ScalarType::String)
            .field("pid", ScalarType::String)
            .field("title", ScalarType::String)
            .field("category", ScalarType::String)
            .field("start", ScalarType::String)
            .field("end", ScalarType::String)
            .field("views", ScalarType::Number)
            .field("tags", ScalarType::StringSet)
    }

    /// Requires a title, and `start`/`end` as `YYYY-MM-DD` with `start <= end`.
    fn validate_attributes(&self) -> bool {
        if self.title.trim().is_empty() {
            return false;
        }

        match (
            parse_date(self.start.as_deref()),
            parse_date(self.end.as_deref()),
        ) {
            (Ok(Some(start)), Ok(Some(end))) => start <= end,
            (Ok(_), Ok(_)) => true,
            _ => false,
        }
    }

    fn to_attributes(&self) -> Attributes {
        let mut attributes = Attributes::new();
        insert_present(&mut attributes, "cid", self.cid.as_str());
        insert_present(&mut attributes, "pid", self.pid.as_str());
        insert_present(&mut attributes, "title", self.title.as_str());
        for (field, value) in [
            ("category", &self.category),
            ("start", &self.start),
            ("end", &self.end),
        ] {
            if let Some(value) = value {
                insert_present(&mut attributes, field, value.as_str());
            }
        }
        if let Some(views) = self.views {
            insert_present(&mut attributes, "views", views);
        }
        insert_present(&mut attributes, "tags", self.tags.clone());
        attributes
    }

    fn from_attributes(attributes: &Attributes) -> Result<Self> {
        Ok(Self {
            cid: get_string(attributes, "cid")?,
            pid: get_string(attributes, "pid")?,
            title: get_optional_string(attributes, "title").unwrap_or_default(),
            category: get_optional_string(attributes, "category"),
            start: get_optional_string(attributes, "start"),
            end: get_optional_string(attributes, "end"),
            views: get_optional_int(attributes, "views")?,
            tags: get_string_set(attributes, "tags")?,
        })
    }
}
