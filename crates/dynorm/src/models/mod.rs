//! Entity types stored by the dynorm binary.

mod account;
mod project;

pub use account::Account;
pub use project::{Project, DATE_FORMAT};

use dynorm_core::model::Registry;
use dynorm_core::storage::Result;

/// Builds the registry of every entity type defined here.
pub fn registry() -> Result<Registry> {
    let mut registry = Registry::new();
    registry.register::<Project>()?;
    registry.register::<Account>()?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_holds_all_models() {
        let registry = registry().unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("Project").unwrap().table_name, "project");
        assert_eq!(registry.get("Account").unwrap().table_name, "account");

        let names: Vec<_> = registry.iter().map(|m| m.entity_type).collect();
        assert_eq!(names, vec!["Account", "Project"]);
    }
}
