//! PostgreSQL implementation of SqlExecutor.
//!
//! One pool per database. Statements are wrapped so that every row comes
//! back as a single `row_to_json` value, which keeps column types (numerics,
//! timestamps, arrays) decodable without per-type handling.

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{PgPool, Row as _};
use std::collections::HashMap;
use std::str::FromStr;

use crate::config::DatabaseConfig;
use crate::domain::query::Row;
use crate::domain::routing::DatabaseId;
use crate::ports::{QueryError, SqlExecutor};

/// PostgreSQL implementation of SqlExecutor.
#[derive(Clone, Default)]
pub struct PostgresSqlExecutor {
    pools: HashMap<DatabaseId, PgPool>,
}

impl PostgresSqlExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the pool used for `database`.
    pub fn with_pool(mut self, database: DatabaseId, pool: PgPool) -> Self {
        self.pools.insert(database, pool);
        self
    }

    /// Builds lazily-connecting pools for every configured database.
    ///
    /// Connections are opened on first use, so an unreachable database only
    /// degrades the turns that query it.
    pub fn from_config(config: &DatabaseConfig) -> Result<Self, QueryError> {
        let mut executor = Self::new();
        for database in DatabaseId::ALL {
            let Some(url) = config.url_for(database) else {
                tracing::warn!(database = %database, "No connection URL configured");
                continue;
            };

            let options = PgConnectOptions::from_str(url)
                .map_err(|e| QueryError::Connection {
                    database,
                    message: format!("Invalid connection URL: {}", e),
                })?
                .options([(
                    "statement_timeout",
                    format!("{}s", config.statement_timeout_secs),
                )]);

            let pool = PgPoolOptions::new()
                .min_connections(config.min_connections)
                .max_connections(config.max_connections)
                .acquire_timeout(config.acquire_timeout())
                .connect_lazy_with(options);

            executor = executor.with_pool(database, pool);
        }
        Ok(executor)
    }
}

/// Wraps a statement so each row is returned as one JSON object.
///
/// The statement sits on its own lines so a comment left inside it cannot
/// swallow the closing parenthesis.
fn wrap_as_json_rows(sql: &str) -> String {
    format!(
        "SELECT row_to_json(q) AS row FROM (\n{}\n) AS q",
        strip_statement_tail(sql)
    )
}

/// Drops trailing terminators, whitespace and comments, in any order.
fn strip_statement_tail(sql: &str) -> &str {
    let mut statement = sql.trim();
    loop {
        let before = statement.len();
        statement = statement.trim_end_matches(';').trim_end();
        if statement.ends_with("*/") {
            if let Some(open) = statement.rfind("/*") {
                statement = statement[..open].trim_end();
            }
        }
        let line_start = statement.rfind('\n').map_or(0, |i| i + 1);
        if let Some(offset) = line_comment_start(&statement[line_start..]) {
            statement = statement[..line_start + offset].trim_end();
        }
        if statement.len() == before {
            return statement;
        }
    }
}

/// Byte offset of a `--` comment outside quoted text on a single line.
fn line_comment_start(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    let mut quote: Option<u8> = None;
    let mut i = 0;
    while i < bytes.len() {
        match (quote, bytes[i]) {
            (Some(q), b) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'\'' | b'"') => quote = Some(bytes[i]),
            (None, b'-') if bytes.get(i + 1) == Some(&b'-') => return Some(i),
            (None, _) => {}
        }
        i += 1;
    }
    None
}

#[async_trait]
impl SqlExecutor for PostgresSqlExecutor {
    async fn execute(&self, database: DatabaseId, sql: &str) -> Result<Vec<Row>, QueryError> {
        if strip_statement_tail(sql).is_empty() {
            return Ok(Vec::new());
        }

        let pool = self
            .pools
            .get(&database)
            .ok_or(QueryError::NotConfigured(database))?;

        let rows = sqlx::query(&wrap_as_json_rows(sql))
            .fetch_all(pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db_err) => QueryError::Statement {
                    database,
                    message: db_err.to_string(),
                },
                other => QueryError::Connection {
                    database,
                    message: other.to_string(),
                },
            })?;

        rows.into_iter()
            .map(|row| {
                let value: serde_json::Value =
                    row.try_get("row").map_err(|e| QueryError::Statement {
                        database,
                        message: format!("Failed to decode row: {}", e),
                    })?;
                Ok(match value {
                    serde_json::Value::Object(map) => map,
                    _ => Row::new(),
                })
            })
            .collect()
    }
}
