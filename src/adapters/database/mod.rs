//! SQL execution adapters.
//!
//! - `PostgresSqlExecutor` - One sqlx pool per database
//! - `MockSqlExecutor` - Scripted rows and failures (testing)

mod mock_executor;
mod postgres_executor;

pub use mock_executor::MockSqlExecutor;
pub use postgres_executor::PostgresSqlExecutor;
