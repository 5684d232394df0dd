//! Fixed enrichment queries keyed by protein identifiers.

use serde::{Deserialize, Serialize};

use super::ProteinId;
use crate::domain::routing::DatabaseId;

/// Secondary lookup run against identifiers found in primary results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentKind {
    Projects,
    Mutations,
}

impl EnrichmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrichmentKind::Projects => "projects",
            EnrichmentKind::Mutations => "mutations",
        }
    }

    /// Builds the enrichment statement, or `None` when there is nothing to look up.
    pub fn sql(&self, db: DatabaseId, ids: &[ProteinId]) -> Option<String> {
        if ids.is_empty() {
            return None;
        }
        let id_list = ids
            .iter()
            .map(ProteinId::to_sql_literal)
            .collect::<Vec<_>>()
            .join(",");

        let sql = match (self, db) {
            (EnrichmentKind::Projects, DatabaseId::Scop3p) => format!(
                "SELECT DISTINCT proj.project_id, proj.project_title, proj.species, \
                 proj.publication_date, proj.submission_type, proj.tissues, \
                 p.protein_name, p.accession \
                 FROM project proj \
                 JOIN peptide pep ON proj.id = pep.l_project_id \
                 JOIN protein p ON pep.l_protein_id = p.id \
                 WHERE p.id IN ({}) \
                 LIMIT 20",
                id_list
            ),
            (EnrichmentKind::Projects, DatabaseId::Scop3ptm) => format!(
                "SELECT DISTINCT proj.project_id, proj.project_title, proj.species, \
                 proj.publication_date, proj.tissue, proj.disease, proj.instrument, \
                 p.protein_name, p.accession \
                 FROM project proj \
                 JOIN peptide_modification pm ON proj.id = pm.l_project_id \
                 JOIN protein p ON pm.l_protein_id = p.id \
                 WHERE p.id IN ({}) \
                 LIMIT 20",
                id_list
            ),
            (EnrichmentKind::Mutations, DatabaseId::Scop3p) => format!(
                "SELECT m.uniprot_position, m.reference_amino_acid, m.alternative_amino_acid, \
                 m.mutation_type, m.disease, p.protein_name, p.accession \
                 FROM mutation m \
                 JOIN protein p ON m.l_protein_id = p.id \
                 WHERE p.id IN ({}) \
                 LIMIT 50",
                id_list
            ),
            (EnrichmentKind::Mutations, DatabaseId::Scop3ptm) => format!(
                "SELECT m.mutation_position, m.reference_amino_acid, m.alternative_amino_acid, \
                 m.mutation_type, m.disease, p.protein_name, p.accession, g.gene_name \
                 FROM mutation m \
                 JOIN protein p ON m.l_protein_id = p.id \
                 LEFT JOIN gene g ON m.l_gene_id = g.id \
                 WHERE p.id IN ({}) \
                 LIMIT 50",
                id_list
            ),
        };
        Some(sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_ids_build_nothing() {
        assert!(EnrichmentKind::Projects.sql(DatabaseId::Scop3p, &[]).is_none());
        assert!(EnrichmentKind::Mutations.sql(DatabaseId::Scop3ptm, &[]).is_none());
    }

    #[test]
    fn project_sql_joins_through_peptides() {
        let sql = EnrichmentKind::Projects
            .sql(DatabaseId::Scop3p, &[ProteinId::Int(4), ProteinId::Int(9)])
            .unwrap();
        assert!(sql.contains("JOIN peptide pep ON proj.id = pep.l_project_id"));
        assert!(sql.contains("WHERE p.id IN (4,9)"));
        assert!(sql.ends_with("LIMIT 20"));
    }

    #[test]
    fn ptm_project_sql_joins_through_modifications() {
        let sql = EnrichmentKind::Projects
            .sql(DatabaseId::Scop3ptm, &[ProteinId::Int(1)])
            .unwrap();
        assert!(sql.contains("JOIN peptide_modification pm"));
        assert!(sql.contains("proj.instrument"));
    }

    #[test]
    fn mutation_sql_differs_per_database() {
        let ids = [ProteinId::Text("P04637".to_string())];
        let scop3p = EnrichmentKind::Mutations.sql(DatabaseId::Scop3p, &ids).unwrap();
        let scop3ptm = EnrichmentKind::Mutations.sql(DatabaseId::Scop3ptm, &ids).unwrap();
        assert!(scop3p.contains("m.uniprot_position"));
        assert!(scop3ptm.contains("LEFT JOIN gene g"));
        assert!(scop3ptm.contains("IN ('P04637')"));
        assert!(scop3p.ends_with("LIMIT 50"));
    }
}
