pub mod memory;
pub mod postgres;
pub mod query;

use std::sync::Arc;

use async_trait::async_trait;
use log::{info, warn};
use sqlx::migrate::MigrateError;
use thiserror::Error;

use crate::config::StorageProvider;
use crate::db::memory::InMemoryEmployeeStore;
use crate::db::postgres::PgEmployeeStore;
use crate::db::query::ListingQuery;
use crate::models::dto::Page;
use crate::models::employee::Employee;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to connect to the database: {0}")]
    Connect(sqlx::Error),
    #[error("failed to run database migrations: {0}")]
    Migration(#[from] MigrateError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("store lock poisoned: {0}")]
    Poisoned(String),
}

/// Durable storage for employees and the job positions they own.
///
/// `replace` and `delete` return `false` when no employee has the given id.
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// Inserts the employee and its positions, returning them with assigned ids.
    async fn insert(&self, employee: Employee) -> Result<Employee, StoreError>;

    async fn insert_many(&self, employees: Vec<Employee>) -> Result<usize, StoreError> {
        let count = employees.len();
        for employee in employees {
            self.insert(employee).await?;
        }
        Ok(count)
    }

    async fn fetch(&self, id: i32) -> Result<Option<Employee>, StoreError>;

    /// Total matching count and the requested page, ordered per the query.
    async fn list(&self, query: &ListingQuery) -> Result<Page<Employee>, StoreError>;

    /// Overwrites the scalar fields and swaps the whole job-position set in one unit.
    async fn replace(&self, id: i32, employee: Employee) -> Result<bool, StoreError>;

    /// Deletes the employee and, by cascade, its job positions.
    async fn delete(&self, id: i32) -> Result<bool, StoreError>;

    async fn count(&self) -> Result<i64, StoreError>;
}

/// Opens the configured backend, applying migrations for Postgres.
pub async fn create_store(provider: &StorageProvider) -> Result<Arc<dyn EmployeeStore>, StoreError> {
    match provider {
        StorageProvider::Postgres { database_url } => {
            let store = PgEmployeeStore::connect(database_url).await?;
            store.run_migrations().await?;
            info!("Connected to Postgres and applied migrations");
            Ok(Arc::new(store))
        }
        StorageProvider::Memory => {
            warn!("Using in-memory storage, records are lost on restart");
            Ok(Arc::new(InMemoryEmployeeStore::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn memory_provider_opens_an_empty_store() {
        let store = create_store(&StorageProvider::Memory).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
    }
}
