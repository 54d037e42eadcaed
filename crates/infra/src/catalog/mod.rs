//! Catalog record stores.

mod in_memory;
mod postgres;
mod store;

use std::sync::Arc;

use storefront_catalog::CatalogResult;

use crate::config::{InfraConfig, StoreKind};

pub use in_memory::InMemoryCatalogStore;
pub use postgres::PostgresCatalogStore;
pub use store::AsyncCatalogStore;

/// The catalog store selected by configuration.
#[derive(Debug, Clone)]
pub enum CatalogBackend {
    InMemory(Arc<InMemoryCatalogStore>),
    Postgres(PostgresCatalogStore),
}

impl CatalogBackend {
    /// Build the store named by `config`. Postgres connects and applies the schema.
    pub async fn connect(config: &InfraConfig) -> CatalogResult<Self> {
        match &config.store {
            StoreKind::Memory => Ok(Self::InMemory(Arc::new(InMemoryCatalogStore::new()))),
            StoreKind::Postgres { database_url } => {
                let store =
                    PostgresCatalogStore::connect(database_url, config.max_connections).await?;
                Ok(Self::Postgres(store))
            }
        }
    }

    /// The selected store behind the backend-neutral interface.
    pub fn store(&self) -> &dyn AsyncCatalogStore {
        match self {
            Self::InMemory(store) => store.as_ref(),
            Self::Postgres(store) => store,
        }
    }

    pub fn in_memory(&self) -> Option<&Arc<InMemoryCatalogStore>> {
        match self {
            Self::InMemory(store) => Some(store),
            Self::Postgres(_) => None,
        }
    }

    pub fn postgres(&self) -> Option<&PostgresCatalogStore> {
        match self {
            Self::Postgres(store) => Some(store),
            Self::InMemory(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use storefront_catalog::{CreateCategory, Visibility};

    use super::*;

    #[tokio::test]
    async fn memory_backend_serves_the_async_interface() {
        let backend = CatalogBackend::connect(&InfraConfig::default()).await.unwrap();
        assert!(backend.in_memory().is_some());

        let store = backend.store();
        store
            .create_category(CreateCategory::named("Footwear"))
            .await
            .unwrap();
        let listed = store.categories(Visibility::All).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].slug.as_str(), "footwear");
    }
}
