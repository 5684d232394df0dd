//! Database identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the two protein modification schemas.
///
/// `Scop3p` holds phosphorylation data; `Scop3ptm` is the broader
/// post-translational-modification schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseId {
    Scop3p,
    Scop3ptm,
}

impl DatabaseId {
    /// Both databases, in query order.
    pub const ALL: [DatabaseId; 2] = [DatabaseId::Scop3p, DatabaseId::Scop3ptm];

    /// Returns the database name as used in prompts and connection config.
    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseId::Scop3p => "scop3p",
            DatabaseId::Scop3ptm => "scop3ptm",
        }
    }

    /// Name of the SQL-generation prompt template for this database.
    pub fn sql_template(&self) -> &'static str {
        match self {
            DatabaseId::Scop3p => "sql_scop3p.txt",
            DatabaseId::Scop3ptm => "sql_scop3ptm.txt",
        }
    }
}

impl fmt::Display for DatabaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatabaseId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scop3p" => Ok(DatabaseId::Scop3p),
            "scop3ptm" => Ok(DatabaseId::Scop3ptm),
            other => Err(format!("unknown database: {}", other)),
        }
    }
}
