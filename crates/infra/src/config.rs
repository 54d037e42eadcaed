//! Configuration loading and representation.
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `STOREFRONT_STORE` | `memory` | `memory` or `postgres` |
//! | `DATABASE_URL` | none | required when the store is `postgres` |
//! | `STOREFRONT_DB_MAX_CONNECTIONS` | `5` | Postgres pool size |

use thiserror::Error;

pub const STORE_VAR: &str = "STOREFRONT_STORE";
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
pub const MAX_CONNECTIONS_VAR: &str = "STOREFRONT_DB_MAX_CONNECTIONS";

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} has unsupported value '{value}' (expected memory or postgres)")]
    UnknownStore { var: &'static str, value: String },

    #[error("{0} must be set when STOREFRONT_STORE=postgres")]
    Missing(&'static str),

    #[error("{var} must be a positive integer, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreKind {
    Memory,
    Postgres { database_url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfraConfig {
    pub store: StoreKind,
    pub max_connections: u32,
}

impl Default for InfraConfig {
    fn default() -> Self {
        Self {
            store: StoreKind::Memory,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl InfraConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_connections = match lookup(MAX_CONNECTIONS_VAR) {
            None => DEFAULT_MAX_CONNECTIONS,
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::InvalidNumber {
                    var: MAX_CONNECTIONS_VAR,
                    value: raw,
                })?,
        };

        let store = match lookup(STORE_VAR).as_deref().map(str::trim) {
            None | Some("") | Some("memory") => StoreKind::Memory,
            Some("postgres") => {
                let database_url = lookup(DATABASE_URL_VAR)
                    .filter(|url| !url.trim().is_empty())
                    .ok_or(ConfigError::Missing(DATABASE_URL_VAR))?;
                StoreKind::Postgres { database_url }
            }
            Some(other) => {
                return Err(ConfigError::UnknownStore {
                    var: STORE_VAR,
                    value: other.to_string(),
                });
            }
        };

        Ok(Self {
            store,
            max_connections,
        })
    }
}
