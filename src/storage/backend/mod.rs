//! SeaORM storage backend
//!
//! Database access for the store, supporting SQLite and PostgreSQL.

mod accounts;
mod carts;
mod catalog;
mod connection;
mod orders;

use sea_orm::DatabaseConnection;
use tracing::info;

use crate::errors::{Result, StoreError};

pub use connection::{connect_generic, connect_sqlite, run_migrations};

/// Infer the database flavor from a connection URL.
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite://")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
        || database_url == ":memory:"
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://")
    {
        Ok("postgres".to_string())
    } else {
        Err(StoreError::database_config(format!(
            "cannot infer database type from URL: {}. Supported formats: sqlite://, postgres://",
            database_url
        )))
    }
}

/// SeaORM-based storage backend
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
}

impl SeaOrmStorage {
    pub async fn new(database_url: &str, backend_name: &str) -> Result<Self> {
        if database_url.is_empty() {
            return Err(StoreError::database_config("database URL not set"));
        }

        let db = if backend_name == "sqlite" {
            connect_sqlite(database_url).await?
        } else {
            connect_generic(database_url, backend_name).await?
        };

        let storage = SeaOrmStorage {
            db,
            backend_name: backend_name.to_string(),
        };

        run_migrations(&storage.db).await?;

        info!(
            "{} storage initialized",
            storage.backend_name.to_uppercase()
        );
        Ok(storage)
    }

    /// Connect using the effective URL from the global config.
    pub async fn from_config() -> Result<Self> {
        let url = crate::config::get_config().effective_database_url();
        let backend = infer_backend_from_url(&url)?;
        Self::new(&url, &backend).await
    }

    pub fn backend_name(&self) -> &str {
        &self.backend_name
    }

    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_backend_from_url() {
        assert_eq!(infer_backend_from_url("sqlite://store.db").unwrap(), "sqlite");
        assert_eq!(infer_backend_from_url("data/shop.sqlite").unwrap(), "sqlite");
        assert_eq!(
            infer_backend_from_url("postgres://u:p@localhost:15432/shop").unwrap(),
            "postgres"
        );
        assert!(infer_backend_from_url("mysql://nope").is_err());
    }
}
