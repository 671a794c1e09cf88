use crate::{db::DbPool, errors::ServiceError};
use async_trait::async_trait;

/// Trait representing a generic asynchronous read-side query.
#[async_trait]
pub trait Query: Send + Sync {
    type Result: Send + Sync;

    /// Executes the query using the provided database connection
    async fn execute(&self, db: &DbPool) -> Result<Self::Result, ServiceError>;
}

pub mod custody_queries;
