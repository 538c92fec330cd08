//! Dataset assembly
//!
//! One load runs as a single sequential chain: fetch the document,
//! extract study metadata and columns, fetch the resource map once,
//! fall back to its variables when the document yields no columns, then
//! enrich. The dataset is only built once every step has finished.

use super::ImportError;
use super::study::StudyMetadata;
use crate::config::SdkConfig;
use crate::enrichment::{Enricher, ResourceMap};
use crate::jsonld::ColumnExtractor;
use crate::models::dataset::{JSON_LD_INPUT_TYPE, JSON_LD_MIME_TYPE};
use crate::models::{Column, Dataset, RepresentationCatalog};
use crate::remote::{LoadRequest, MetadataSource};
use chrono::Utc;
use serde_json::Value;
use tracing::{info, warn};

/// Parses JSON-LD text into a document.
pub fn parse_document(text: &str) -> Result<Value, ImportError> {
    let document: Value = serde_json::from_str(text)
        .map_err(|e| ImportError::ParseError(format!("Failed to parse JSON-LD: {}", e)))?;
    ensure_object(&document)?;
    Ok(document)
}

fn ensure_object(document: &Value) -> Result<(), ImportError> {
    if document.is_object() {
        Ok(())
    } else {
        Err(ImportError::InvalidDocument(
            "JSON-LD document must be a JSON object".to_string(),
        ))
    }
}

/// Builds a dataset from a document and its final column list.
pub fn build_dataset(document: Value, columns: Vec<Column>) -> Dataset {
    let study = StudyMetadata::extract(&document);
    let serialized_document = serde_json::to_string_pretty(&document).unwrap_or_default();
    Dataset {
        file_name: study.file_name,
        study_name: study.study_name,
        schema_org_name: study.schema_org_name,
        study_description: study.study_description,
        study_group_name: study.study_group_name,
        study_group_description: study.study_group_description,
        mime_type: JSON_LD_MIME_TYPE.to_string(),
        input_type: JSON_LD_INPUT_TYPE.to_string(),
        columns,
        raw_document: document,
        serialized_document,
        last_modified: Utc::now(),
        ..Default::default()
    }
}

/// Assembles a dataset from the document alone, without remote fallback
/// or enrichment.
pub fn assemble_offline(
    document: Value,
    extractor: &ColumnExtractor,
) -> Result<Dataset, ImportError> {
    ensure_object(&document)?;
    let columns = extractor.extract_columns(&document);
    info!("Extracted {} columns from JSON-LD", columns.len());
    Ok(build_dataset(document, columns))
}

/// Runs the full extraction pipeline against a [`MetadataSource`].
pub struct DatasetAssembler<S> {
    source: S,
    config: SdkConfig,
    extractor: ColumnExtractor,
    enricher: Enricher,
}

impl<S: MetadataSource> DatasetAssembler<S> {
    /// Create an assembler with the default representation catalog
    pub fn new(source: S, config: SdkConfig) -> Self {
        let extractor =
            ColumnExtractor::new(config.extraction_catalog(), RepresentationCatalog::default());
        Self {
            source,
            config,
            extractor,
            enricher: Enricher::new(),
        }
    }

    /// Replace the representation catalog used for type inference
    pub fn with_representation_catalog(mut self, types: RepresentationCatalog) -> Self {
        self.extractor = ColumnExtractor::new(self.config.extraction_catalog(), types);
        self
    }

    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    pub fn extractor(&self) -> &ColumnExtractor {
        &self.extractor
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetches the document a request points at and assembles it.
    ///
    /// A failed document fetch ends the load with an error. Resource map
    /// failures only cost the fallback and enrichment steps.
    pub async fn load(&self, request: &LoadRequest) -> Result<Dataset, ImportError> {
        let params = request.effective_params(&self.config.defaults.to_params());
        let url = self.config.endpoints().document_url(&params);
        let document = self.source.fetch_document(&url).await?;
        self.assemble(document, params.persistent_id()).await
    }

    /// Assembles an already fetched document.
    pub async fn assemble(
        &self,
        document: Value,
        persistent_id: &str,
    ) -> Result<Dataset, ImportError> {
        ensure_object(&document)?;

        let mut columns = self.extractor.extract_columns(&document);
        info!("Extracted {} columns from JSON-LD", columns.len());

        let fallback = columns.is_empty() && self.config.enrichment.fallback_enabled;
        if fallback || self.config.enrichment.enabled {
            let resource_map = self.fetch_resource_map(persistent_id).await;

            if fallback {
                warn!("No variables found in JSON-LD, using resource map variables");
                columns = resource_map.fallback_columns(self.extractor.inferencer());
                if columns.is_empty() {
                    warn!("Resource map also returned no variables");
                } else {
                    info!("Fetched {} variables from resource map", columns.len());
                }
            }

            if self.config.enrichment.enabled {
                self.enricher.enrich(&mut columns, &resource_map);
            }
        }

        Ok(build_dataset(document, columns))
    }

    /// Resource map for `persistent_id`; empty on any failure.
    async fn fetch_resource_map(&self, persistent_id: &str) -> ResourceMap {
        if persistent_id.is_empty() {
            warn!("No dataset persistent identifier, skipping resource map");
            return ResourceMap::default();
        }

        let url = self.config.endpoints().resourcemap_url(persistent_id);
        match self.source.fetch_resource_map(&url).await {
            Ok(body) => {
                let map = ResourceMap::from_value(&body);
                info!(
                    "Resource map has {} variables and {} results",
                    map.variables.len(),
                    map.results.len()
                );
                map
            }
            Err(e) => {
                warn!("Failed to fetch resource map: {}", e);
                ResourceMap::default()
            }
        }
    }
}
