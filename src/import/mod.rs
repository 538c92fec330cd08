//! Import functionality
//!
//! Turns CDI JSON-LD documents into [`Dataset`](crate::models::Dataset)s:
//! - Study metadata from the dataset node
//! - Columns from the document, or from the resource map as a fallback
//! - Definitions from the resource map's enrichment results

pub mod assembler;
pub mod session;
pub mod study;

pub use assembler::{DatasetAssembler, assemble_offline, build_dataset, parse_document};
pub use session::DatasetSession;
pub use study::StudyMetadata;

use crate::remote::FetchError;

/// Error during import
#[derive(Debug, thiserror::Error, serde::Serialize, serde::Deserialize)]
pub enum ImportError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}
