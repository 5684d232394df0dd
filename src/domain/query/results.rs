//! Rows returned by the databases.

use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::domain::routing::DatabaseId;

/// One row: column name to scalar value.
pub type Row = Map<String, Value>;

/// Rows per database for a single domain query.
pub type QueryResultSet = BTreeMap<DatabaseId, Vec<Row>>;

/// Columns conventionally holding a protein identifier.
pub const ID_COLUMNS: [&str; 3] = ["id", "l_protein_id", "protein_id"];

/// A protein identifier lifted from a result row.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProteinId {
    Int(i64),
    Text(String),
}

impl ProteinId {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(ProteinId::Int),
            Value::String(s) if !s.trim().is_empty() => Some(ProteinId::Text(s.trim().to_string())),
            _ => None,
        }
    }

    /// Renders the identifier as a SQL literal.
    ///
    /// Integers are emitted bare; text is single-quoted with quotes doubled.
    pub fn to_sql_literal(&self) -> String {
        match self {
            ProteinId::Int(n) => n.to_string(),
            ProteinId::Text(s) => format!("'{}'", s.replace('\'', "''")),
        }
    }
}

impl fmt::Display for ProteinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProteinId::Int(n) => write!(f, "{}", n),
            ProteinId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Collects distinct identifiers from every identifier column of every row.
///
/// Nulls, floats and blank strings are ignored. The result is sorted.
pub fn extract_protein_ids(rows: &[Row]) -> Vec<ProteinId> {
    let ids: BTreeSet<ProteinId> = rows
        .iter()
        .flat_map(|row| ID_COLUMNS.iter().filter_map(move |col| row.get(*col)))
        .filter_map(ProteinId::from_value)
        .collect();
    ids.into_iter().collect()
}

/// Returns true if any database produced at least one row.
pub fn has_rows(results: &QueryResultSet) -> bool {
    results.values().any(|rows| !rows.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn collects_ids_from_all_columns_deduplicated() {
        let rows = vec![
            row(json!({"id": 3, "protein_name": "TP53"})),
            row(json!({"l_protein_id": 1, "protein_id": 3})),
            row(json!({"id": null, "accession": "P04637"})),
        ];
        assert_eq!(
            extract_protein_ids(&rows),
            vec![ProteinId::Int(1), ProteinId::Int(3)]
        );
    }

    #[test]
    fn text_ids_are_kept_and_quoted() {
        let rows = vec![row(json!({"protein_id": "O'Brien"})), row(json!({"id": " "}))];
        let ids = extract_protein_ids(&rows);
        assert_eq!(ids, vec![ProteinId::Text("O'Brien".to_string())]);
        assert_eq!(ids[0].to_sql_literal(), "'O''Brien'");
    }

    #[test]
    fn no_rows_no_ids() {
        assert!(extract_protein_ids(&[]).is_empty());
    }

    #[test]
    fn has_rows_requires_a_non_empty_branch() {
        let mut results = QueryResultSet::new();
        assert!(!has_rows(&results));
        results.insert(DatabaseId::Scop3p, Vec::new());
        assert!(!has_rows(&results));
        results.insert(DatabaseId::Scop3ptm, vec![row(json!({"id": 1}))]);
        assert!(has_rows(&results));
    }
}
