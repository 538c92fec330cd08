//! JSON-LD reading
//!
//! Provides the pieces that turn a loosely structured CDI JSON-LD
//! document into columns:
//! - Node lookup across `@graph` and `CDIGenerated`
//! - Property resolution over vocabulary spelling variants
//! - Column extraction (label and xdi conventions)
//! - Representation-type inference

pub mod columns;
pub mod inference;
pub mod node_index;
pub mod property;

pub use columns::{
    CandidateSource, ColumnExtractor, ExtractionCatalog, VariableCandidate, COLUMN_INDEX_NODE,
    LABEL_ROOT,
};
pub use inference::TypeInferencer;
pub use node_index::{find_dataset_node, find_node_by_id, find_node_by_type, NodeIndex};
pub use property::{extract_value, first_present, reference_id, PropertyResolver};
