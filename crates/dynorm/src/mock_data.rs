use dynorm_core::repository::Record;
use dynorm_core::storage::Result;

use crate::models::{Account, Project};
use crate::state::AppState;

/// Client id shared by the demo projects.
pub const DEMO_CLIENT_ID: &str = "acme";

/// Generates demo projects for one client.
pub fn demo_projects() -> Vec<Project> {
    vec![
        Project::new(DEMO_CLIENT_ID, "website", "Website Redesign")
            .with_category("design")
            .with_dates("2024-01-08", "2024-03-29")
            .with_tags(&["web", "q1"]),
        Project::new(DEMO_CLIENT_ID, "mobile", "Mobile App")
            .with_category("engineering")
            .with_dates("2024-02-01", "2024-06-30")
            .with_tags(&["ios", "android"]),
        Project::new(DEMO_CLIENT_ID, "launch", "Launch Campaign")
            .with_category("marketing")
            .with_dates("2024-06-01", "2024-07-15"),
        Project::new("globex", "audit", "Security Audit").with_category("engineering"),
        Project::new("globex", "onboarding", "Customer Onboarding").with_tags(&["support"]),
    ]
}

/// Generates demo accounts.
pub fn demo_accounts() -> Vec<Account> {
    let mut admin = Account::new("ada", "ada@example.com");
    admin.roles = vec!["admin".to_string(), "editor".to_string()];
    admin.login_count = Some(12);

    vec![admin, Account::new("grace", "grace@example.com")]
}

/// Saves every demo entity through the repositories. Returns the number saved.
pub async fn seed(state: &AppState) -> Result<usize> {
    let mut saved = 0;

    for project in demo_projects() {
        state.projects.validate(&project)?;
        state.projects.save(&mut Record::new(project)).await?;
        saved += 1;
    }
    for account in demo_accounts() {
        state.accounts.validate(&account)?;
        state.accounts.save(&mut Record::new(account)).await?;
        saved += 1;
    }

    Ok(saved)
}
