//! Models module for the SDK
//!
//! Defines the dataset and column structures produced by the extraction
//! pipeline and consumed by the exporters.

pub mod column;
pub mod dataset;
pub mod representation;

pub use column::Column;
pub use dataset::Dataset;
pub use representation::{RepresentationCatalog, RepresentationType, TypeQuery};
