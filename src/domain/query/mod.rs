//! Query result model and the fixed enrichment queries.

mod enrichment;
mod results;

pub use enrichment::EnrichmentKind;
pub use results::{extract_protein_ids, has_rows, ProteinId, QueryResultSet, Row, ID_COLUMNS};
