//! SQL Executor Port - Runs generated and fixed SQL against a named database.

use async_trait::async_trait;

use crate::domain::query::Row;
use crate::domain::routing::DatabaseId;

/// Errors from executing a statement.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("no connection configured for database {0}")]
    NotConfigured(DatabaseId),

    #[error("connection to {database} failed: {message}")]
    Connection { database: DatabaseId, message: String },

    #[error("statement failed on {database}: {message}")]
    Statement { database: DatabaseId, message: String },
}

/// Port for SQL execution.
///
/// Callers in the core treat every error as an empty result for that
/// database.
#[async_trait]
pub trait SqlExecutor: Send + Sync {
    /// Executes `sql` against `database`, returning rows in order.
    async fn execute(&self, database: DatabaseId, sql: &str) -> Result<Vec<Row>, QueryError>;
}
