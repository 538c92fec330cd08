//! CDI Metadata SDK - Dataset metadata from DDI-CDI JSON-LD documents
//!
//! Provides unified interfaces for:
//! - JSON-LD node lookup and property resolution
//! - Column extraction with type inference
//! - Resource-map fallback and definition enrichment
//! - Dataset assembly from remote or local documents
//! - Markdown/CSV previews

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod enrichment;
pub mod export;
pub mod import;
pub mod jsonld;
pub mod models;
pub mod remote;

// Re-export commonly used types
pub use config::{ConfigError, SdkConfig};
pub use enrichment::{Enricher, EnrichmentReport, ParsedPayload, PayloadRecovery, ResourceMap};
pub use export::{CsvExporter, ExportError, ExportResult, JsonExporter, MarkdownExporter};
pub use import::{
    DatasetAssembler, DatasetSession, ImportError, StudyMetadata, assemble_offline,
    parse_document,
};
pub use jsonld::{ColumnExtractor, ExtractionCatalog, TypeInferencer};
#[cfg(feature = "api-backend")]
pub use remote::HttpMetadataSource;
pub use remote::{Endpoints, FetchError, LoadParams, LoadRequest, MetadataSource, PageMode};

// Re-export models
pub use models::{Column, Dataset, RepresentationCatalog, RepresentationType};

// WASM bindings for extraction functions
#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
mod wasm {
    use crate::enrichment::parse_payload;
    use crate::import::ImportError;
    use crate::jsonld::ColumnExtractor;
    use serde::Serialize;
    use wasm_bindgen::prelude::*;

    /// Convert ImportError to JsValue for JavaScript error handling
    fn import_error_to_js(err: ImportError) -> JsValue {
        JsValue::from_str(&err.to_string())
    }

    fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
        serde_json::to_string(value)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Extract the column list from a JSON-LD document.
    ///
    /// # Arguments
    ///
    /// * `json` - JSON-LD document as a string
    ///
    /// # Returns
    ///
    /// JSON array of columns, or JsValue error
    #[wasm_bindgen]
    pub fn extract_columns_from_jsonld(json: &str) -> Result<String, JsValue> {
        let document = crate::import::parse_document(json).map_err(import_error_to_js)?;
        to_json(&ColumnExtractor::default().extract_columns(&document))
    }

    /// Assemble a dataset from a JSON-LD document without network access.
    #[wasm_bindgen]
    pub fn assemble_dataset_offline(json: &str) -> Result<String, JsValue> {
        let document = crate::import::parse_document(json).map_err(import_error_to_js)?;
        let dataset = crate::import::assemble_offline(document, &ColumnExtractor::default())
            .map_err(import_error_to_js)?;
        to_json(&dataset)
    }

    /// Parse a model-generated definition payload.
    ///
    /// # Returns
    ///
    /// JSON string of `{value, recovery}`; never fails on malformed input
    #[wasm_bindgen]
    pub fn parse_definition_payload(text: &str) -> Result<String, JsValue> {
        to_json(&parse_payload(text))
    }

    /// Load the dataset for a page, the way the hosted page does on start.
    ///
    /// # Arguments
    ///
    /// * `path` - Page path; a path containing `/dataverse` always uses the query parameters
    /// * `query` - Page query string
    ///
    /// # Returns
    ///
    /// Promise that resolves to the dataset JSON, or rejects with error
    #[cfg(feature = "api-backend")]
    #[wasm_bindgen]
    pub fn load_dataset_from_page(path: &str, query: &str) -> js_sys::Promise {
        let request = crate::remote::LoadRequest::from_page(path, query);
        wasm_bindgen_futures::future_to_promise(async move {
            let assembler = crate::import::DatasetAssembler::new(
                crate::remote::HttpMetadataSource::new(),
                crate::config::SdkConfig::default(),
            );
            let dataset = assembler.load(&request).await.map_err(import_error_to_js)?;
            to_json(&dataset).map(|s| JsValue::from_str(&s))
        })
    }
}
