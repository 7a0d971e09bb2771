use std::sync::Arc;

use dynorm_core::model::Registry;
use dynorm_core::repository::Repository;
use dynorm_core::storage::{Result, StoreClient};

use crate::config::Config;
use crate::models::{self, Account, Project};

/// Shared store handle used by every repository.
pub type SharedStore = Arc<dyn StoreClient>;

/// Repositories and metadata for every entity type, over one store.
pub struct AppState {
    pub config: Config,
    pub registry: Registry,
    pub projects: Repository<Project, dyn StoreClient>,
    pub accounts: Repository<Account, dyn StoreClient>,
}

impl AppState {
    /// Builds repositories over `store`, applying the configured table prefix
    /// and page size.
    pub fn new(store: SharedStore, config: Config) -> Result<Self> {
        let projects = Repository::<Project, _>::new(Arc::clone(&store))?
            .with_table_prefix(&config.table_prefix)
            .with_page_size(config.page_size);
        let accounts = Repository::<Account, _>::new(store)?
            .with_table_prefix(&config.table_prefix)
            .with_page_size(config.page_size);

        Ok(Self {
            registry: models::registry()?,
            config,
            projects,
            accounts,
        })
    }
}

#[cfg(feature = "inmemory")]
mod inmemory_impl {
    use super::*;
    use crate::mock_data;
    use crate::storage::{InMemoryStore, TableSchema};

    impl AppState {
        /// Creates state over an in-memory store seeded with demo data.
        pub async fn with_demo_data(config: Config) -> Result<Self> {
            let store = Arc::new(InMemoryStore::new());
            let state = Self::new(Arc::clone(&store) as SharedStore, config)?;
            store
                .create_table(TableSchema::for_model::<Project>(state.projects.table_name()))
                .await;
            store
                .create_table(TableSchema::for_model::<Account>(state.accounts.table_name()))
                .await;

            let seeded = mock_data::seed(&state).await?;
            tracing::info!(items = seeded, "Seeded in-memory store with demo data");

            Ok(state)
        }
    }
}

#[cfg(feature = "dynamodb")]
mod dynamodb_impl {
    use super::*;
    use crate::storage::DynamoDbStore;

    impl AppState {
        /// Creates state over DynamoDB using the AWS default credential chain.
        pub async fn with_dynamodb(config: Config) -> Result<Self> {
            let store = Arc::new(DynamoDbStore::from_config(&config).await);
            tracing::info!(
                region = config.region.as_deref().unwrap_or("default"),
                endpoint = config.endpoint_url.as_deref().unwrap_or("default"),
                "Using DynamoDB store"
            );
            Self::new(store, config)
        }
    }
}
