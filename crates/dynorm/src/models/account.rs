use serde::{Deserialize, Serialize};

use dynorm_core::model::{
    get_optional_int, get_optional_string, get_string, get_string_set, insert_present,
    Attributes, Model, Rules, ScalarType,
};
use dynorm_core::storage::Result;

/// A user account, keyed by id alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
}

impl Account {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            ..Self::default()
        }
    }
}

impl Model for Account {
    const ENTITY_TYPE: &'static str = "Account";

    fn table_name() -> &'static str {
        "account"
    }

    fn rules() -> Rules {
        Rules::new("id")
            .field("id", ScalarType::String)
            .field("email", ScalarType::String)
            .field("login_count", ScalarType::Number)
            .field("roles", ScalarType::StringSet)
    }

    fn validate_attributes(&self) -> bool {
        match self.email.split_once('@') {
            Some((user, domain)) => !user.is_empty() && domain.contains('.'),
            None => false,
        }
    }

    fn to_attributes(&self) -> Attributes {
        let mut attributes = Attributes::new();
        insert_present(&mut attributes, "id", self.id.as_str());
        insert_present(&mut attributes, "email", self.email.as_str());
        if let Some(count) = self.login_count {
            insert_present(&mut attributes, "login_count", count);
        }
        insert_present(&mut attributes, "roles", self.roles.clone());
        attributes
    }

    fn from_attributes(attributes: &Attributes) -> Result<Self> {
        Ok(Self {
            id: get_string(attributes, "id")?,
            email: get_optional_string(attributes, "email").unwrap_or_default(),
            login_count: get_optional_int(attributes, "login_count")?,
            roles: get_string_set(attributes, "roles")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_key_only() {
        let keys = Account::primary_key_fields();
        assert_eq!(keys.hash_key, "id");
        assert_eq!(keys.range_key, None);
    }

    #[test]
    fn test_validation() {
        assert!(Account::new("a1", "ada@example.com").validate_attributes());
        assert!(!Account::new("a1", "ada").validate_attributes());
        assert!(!Account::new("a1", "@example.com").validate_attributes());
    }
}
