//! Pools for the Scop3P and Scop3PTM PostgreSQL databases

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::routing::DatabaseId;

const MAX_POOL_SIZE: u32 = 100;

/// Connection settings for the two protein modification databases
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Unset or empty disables Scop3P lookups
    #[serde(default = "default_scop3p_url")]
    pub scop3p_url: Option<String>,

    #[serde(default = "default_scop3ptm_url")]
    pub scop3ptm_url: Option<String>,

    /// Idle connections kept open, per database
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// How long a query waits for a free connection
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,

    /// Server-side limit on a single generated statement, in seconds
    #[serde(default = "default_statement_timeout")]
    pub statement_timeout_secs: u64,
}

impl DatabaseConfig {
    /// `None` when the database has no usable URL
    pub fn url_for(&self, database: DatabaseId) -> Option<&str> {
        let url = match database {
            DatabaseId::Scop3p => &self.scop3p_url,
            DatabaseId::Scop3ptm => &self.scop3ptm_url,
        };
        url.as_deref().filter(|u| !u.is_empty())
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let urls = [
            (DatabaseId::Scop3p, "DATABASE__SCOP3P_URL"),
            (DatabaseId::Scop3ptm, "DATABASE__SCOP3PTM_URL"),
        ];
        if let Some((_, key)) = urls.iter().find(|(db, _)| {
            self.url_for(*db)
                .map_or(false, |url| !is_postgres_url(url))
        }) {
            return Err(ValidationError::InvalidDatabaseUrl(*key));
        }
        if self.min_connections > self.max_connections {
            return Err(ValidationError::InvalidPoolSize);
        }
        if self.max_connections > MAX_POOL_SIZE {
            return Err(ValidationError::PoolSizeTooLarge);
        }
        if self.statement_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            scop3p_url: default_scop3p_url(),
            scop3ptm_url: default_scop3ptm_url(),
            min_connections: default_min_connections(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout(),
            statement_timeout_secs: default_statement_timeout(),
        }
    }
}

fn is_postgres_url(url: &str) -> bool {
    url.starts_with("postgres://") || url.starts_with("postgresql://")
}

fn default_scop3p_url() -> Option<String> {
    Some("postgres://postgres@localhost:5432/scop3p".to_string())
}

fn default_scop3ptm_url() -> Option<String> {
    Some("postgres://postgres@localhost:5432/scop3ptm".to_string())
}

fn default_min_connections() -> u32 {
    0
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout() -> u64 {
    10
}

fn default_statement_timeout() -> u64 {
    30
}
