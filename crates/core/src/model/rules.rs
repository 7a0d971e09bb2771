use std::collections::BTreeMap;

/// Declared wire type of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    String,
    Number,
    Binary,
    StringSet,
    NumberSet,
    BinarySet,
}

impl ScalarType {
    /// Returns the wire type tag for this type.
    pub fn tag(&self) -> &'static str {
        match self {
            ScalarType::String => "S",
            ScalarType::Number => "N",
            ScalarType::Binary => "B",
            ScalarType::StringSet => "SS",
            ScalarType::NumberSet => "NS",
            ScalarType::BinarySet => "BS",
        }
    }
}

/// The fields that make up an entity's primary key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyFields {
    pub hash_key: String,
    pub range_key: Option<String>,
}

impl KeyFields {
    /// Returns true when `field` is the hash or range key.
    pub fn contains(&self, field: &str) -> bool {
        self.hash_key == field || self.range_key.as_deref() == Some(field)
    }

    /// Iterates over the key field names, hash key first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.hash_key.as_str()).chain(self.range_key.as_deref())
    }
}

/// Static rules for an entity type: its key fields and attribute types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rules {
    pub required: KeyFields,
    pub types: BTreeMap<String, ScalarType>,
}

impl Rules {
    /// Starts a rule declaration with the given hash key field.
    pub fn new(hash_key: impl Into<String>) -> Self {
        Self {
            required: KeyFields {
                hash_key: hash_key.into(),
                range_key: None,
            },
            types: BTreeMap::new(),
        }
    }

    /// Sets the range key field.
    pub fn with_range_key(mut self, range_key: impl Into<String>) -> Self {
        self.required.range_key = Some(range_key.into());
        self
    }

    /// Declares the type of a field.
    pub fn field(mut self, name: impl Into<String>, scalar_type: ScalarType) -> Self {
        self.types.insert(name.into(), scalar_type);
        self
    }

    /// Checks that every key field has a declared type.
    ///
    /// Key fields must be scalar (`S`, `N` or `B`).
    pub fn check(&self) -> Result<(), String> {
        for field in self.required.iter() {
            match self.types.get(field) {
                None => return Err(format!("key field '{}' has no declared type", field)),
                Some(ScalarType::String | ScalarType::Number | ScalarType::Binary) => {}
                Some(other) => {
                    return Err(format!(
                        "key field '{}' must be scalar, found {}",
                        field,
                        other.tag()
                    ))
                }
            }
        }
        Ok(())
    }

    /// Declared fields that are not part of the primary key.
    pub fn updatable_fields(&self) -> Vec<String> {
        self.types
            .keys()
            .filter(|field| !self.required.contains(field))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project_rules() -> Rules {
        Rules::new("cid")
            .with_range_key("pid")
            .field("cid", ScalarType::String)
            .field("pid", ScalarType::String)
            .field("title", ScalarType::String)
            .field("views", ScalarType::Number)
    }

    #[test]
    fn test_check_accepts_declared_keys() {
        assert!(project_rules().check().is_ok());
    }

    #[test]
    fn test_check_rejects_undeclared_key() {
        let rules = Rules::new("cid")
            .with_range_key("pid")
            .field("pid", ScalarType::String);

        let err = rules.check().unwrap_err();
        assert!(err.contains("cid"));
    }

    #[test]
    fn test_check_rejects_set_key() {
        let rules = Rules::new("tags").field("tags", ScalarType::StringSet);
        assert!(rules.check().is_err());
    }

    #[test]
    fn test_updatable_fields_exclude_keys() {
        assert_eq!(
            project_rules().updatable_fields(),
            vec!["title".to_string(), "views".to_string()]
        );
    }

    #[test]
    fn test_key_fields_iter() {
        let rules = project_rules();
        let keys: Vec<&str> = rules.required.iter().collect();
        assert_eq!(keys, vec!["cid", "pid"]);
    }
}
