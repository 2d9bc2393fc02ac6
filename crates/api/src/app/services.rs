//! Service wiring: pick a store from configuration and start the directory.

use anyhow::Context;

use stockroom_infra::{AppConfig, InMemoryItemStore, ItemDirectory, PostgresItemStore};

pub async fn build_directory(config: &AppConfig) -> anyhow::Result<ItemDirectory> {
    match &config.database_url {
        Some(url) => {
            tracing::info!("using postgres item store");
            let store = PostgresItemStore::connect(url)
                .await
                .context("failed to connect to postgres item store")?;
            ItemDirectory::start(store)
                .await
                .context("failed to load items from postgres")
        }
        None => {
            tracing::warn!("USE_PERSISTENT_STORES not enabled; items live in memory only");
            ItemDirectory::start(InMemoryItemStore::new())
                .await
                .context("failed to start in-memory item directory")
        }
    }
}
