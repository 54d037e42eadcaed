//! Infrastructure layer: record stores, Postgres, configuration.

pub mod accounts;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod lifecycle;
pub mod pricing;

pub use accounts::InMemoryUserStore;
pub use cart::InMemoryCartStore;
pub use catalog::{AsyncCatalogStore, CatalogBackend, InMemoryCatalogStore, PostgresCatalogStore};
pub use config::{ConfigError, InfraConfig, StoreKind};
pub use pricing::price_cart;

#[cfg(test)]
mod integration_tests;
