//! Mock SQL executor for testing.
//!
//! Rows are scripted per database, failures can be injected per database,
//! and every executed statement is recorded.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use crate::domain::query::Row;
use crate::domain::routing::DatabaseId;
use crate::ports::{QueryError, SqlExecutor};

#[derive(Debug, Clone, Default)]
pub struct MockSqlExecutor {
    /// Rows returned for statements containing a needle, checked in order.
    rules: Arc<Mutex<Vec<(DatabaseId, String, Vec<Row>)>>>,
    /// Rows returned when no rule matches.
    default_rows: Arc<Mutex<HashMap<DatabaseId, Vec<Row>>>>,
    failing: Arc<Mutex<HashSet<DatabaseId>>>,
    calls: Arc<Mutex<Vec<(DatabaseId, String)>>>,
}

impl MockSqlExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `rows` for every statement on `database` without a matching rule.
    pub fn with_rows(self, database: DatabaseId, rows: Vec<Row>) -> Self {
        self.default_rows.lock().unwrap().insert(database, rows);
        self
    }

    /// Returns `rows` for statements on `database` containing `needle`.
    pub fn with_rows_for(self, database: DatabaseId, needle: impl Into<String>, rows: Vec<Row>) -> Self {
        self.rules
            .lock()
            .unwrap()
            .push((database, needle.into(), rows));
        self
    }

    /// Fails every statement on `database`.
    pub fn failing_on(self, database: DatabaseId) -> Self {
        self.failing.lock().unwrap().insert(database);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Executed statements in order.
    pub fn get_calls(&self) -> Vec<(DatabaseId, String)> {
        self.calls.lock().unwrap().clone()
    }

    /// Executed statements for one database.
    pub fn statements_for(&self, database: DatabaseId) -> Vec<String> {
        self.get_calls()
            .into_iter()
            .filter(|(db, _)| *db == database)
            .map(|(_, sql)| sql)
            .collect()
    }
}

#[async_trait]
impl SqlExecutor for MockSqlExecutor {
    async fn execute(&self, database: DatabaseId, sql: &str) -> Result<Vec<Row>, QueryError> {
        self.calls.lock().unwrap().push((database, sql.to_string()));

        if self.failing.lock().unwrap().contains(&database) {
            return Err(QueryError::Statement {
                database,
                message: "relation does not exist".to_string(),
            });
        }

        let matched = self
            .rules
            .lock()
            .unwrap()
            .iter()
            .find(|(db, needle, _)| *db == database && sql.contains(needle.as_str()))
            .map(|(_, _, rows)| rows.clone());
        if let Some(rows) = matched {
            return Ok(rows);
        }

        Ok(self
            .default_rows
            .lock()
            .unwrap()
            .get(&database)
            .cloned()
            .unwrap_or_default())
    }
}
