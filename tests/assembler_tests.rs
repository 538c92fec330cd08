//! Dataset assembly tests against an in-memory metadata source

use async_trait::async_trait;
use cdi_metadata_sdk::config::SdkConfig;
use cdi_metadata_sdk::import::{DatasetAssembler, DatasetSession, ImportError};
use cdi_metadata_sdk::remote::{FetchError, LoadParams, LoadRequest, MetadataSource, PageMode};
use serde_json::{Value, json};
use std::cell::RefCell;

/// Serves fixed bodies and records every requested URL.
struct StaticSource {
    document: Result<Value, FetchError>,
    resource_map: Result<Value, FetchError>,
    requested: RefCell<Vec<String>>,
}

impl StaticSource {
    fn new(document: Value, resource_map: Value) -> Self {
        Self {
            document: Ok(document),
            resource_map: Ok(resource_map),
            requested: RefCell::new(Vec::new()),
        }
    }

    fn failing_document(status: u16) -> Self {
        Self {
            document: Err(FetchError::Status {
                url: "https://cdi.test/cdi".to_string(),
                status,
            }),
            resource_map: Ok(json!({})),
            requested: RefCell::new(Vec::new()),
        }
    }

    fn requested(&self) -> Vec<String> {
        self.requested.borrow().clone()
    }
}

#[async_trait(?Send)]
impl MetadataSource for StaticSource {
    async fn fetch_document(&self, url: &str) -> Result<Value, FetchError> {
        self.requested.borrow_mut().push(url.to_string());
        self.document.clone()
    }

    async fn fetch_resource_map(&self, url: &str) -> Result<Value, FetchError> {
        self.requested.borrow_mut().push(url.to_string());
        self.resource_map.clone()
    }
}

fn test_config() -> SdkConfig {
    let mut config = SdkConfig::default();
    config.endpoints.cdi_url = "https://cdi.test/cdi".to_string();
    config.endpoints.resourcemap_url = "https://dv.test/api/datasets/export".to_string();
    config
}

/// A document whose label index lists energy and i0.
fn xas_document() -> Value {
    json!({
        "@graph": [
            {
                "@id": "https://doi.org/10.5072/FK2/4ZSKVU",
                "@type": "schema:Dataset",
                "name": "Cu foil XAS",
                "description": "Copper K-edge transmission scan",
                "publisher": {"@id": "#lab"}
            },
            {"@id": "#lab", "name": "Beamline 8-BM", "description": "Bending magnet beamline"},
            {
                "@id": "https://ddi-cdi.org/label/Column",
                "https://ddi-cdi.org/label/1": {"@id": "#c1"},
                "https://ddi-cdi.org/label/2": {"@id": "#c2"}
            },
            {"@id": "#c1", "http://www.w3.org/2004/02/skos/core#definition": "energy (eV)"},
            {"@id": "#c2", "http://www.w3.org/2004/02/skos/core#definition": "i0"}
        ]
    })
}

/// A document with a dataset node but no label index.
fn unlabelled_document() -> Value {
    json!({
        "@graph": [
            {"@id": "https://doi.org/10.5072/FK2/ABC", "@type": "Dataset", "name": "Survey"}
        ]
    })
}

fn complete_request() -> LoadRequest {
    LoadRequest::from_page(
        "/cdi.html",
        "?fileid=12&siteUrl=https%3A%2F%2Fdv.test&datasetid=doi%3A10.5072%2FFK2%2FABC&datasetversion=1.0&locale=en",
    )
}

mod load_tests {
    use super::*;

    #[tokio::test]
    async fn test_incomplete_standalone_request_uses_defaults() {
        let source = StaticSource::new(xas_document(), json!({}));
        let assembler = DatasetAssembler::new(source, test_config());

        let request = LoadRequest::from_page("/cdi.html", "?fileid=5");
        assembler.load(&request).await.unwrap();

        assert_eq!(
            assembler.source().requested(),
            vec![
                "https://cdi.test/cdi?fileid=38&siteUrl=https%3A%2F%2Fdataverse.dev.codata.org&datasetid=doi%3A10.5072%2FFK2%2F4ZSKVU&datasetversion=3.0&locale=en".to_string(),
                "https://dv.test/api/datasets/export?exporter=resourcemap&persistentId=doi%3A10.5072%2FFK2%2F4ZSKVU".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_dataverse_request_keeps_missing_params_empty() {
        let source = StaticSource::new(xas_document(), json!({}));
        let assembler = DatasetAssembler::new(source, test_config());

        let request = LoadRequest::from_page("/dataverse/cdi", "fileid=7&datasetid=doi:10.1/X");
        assert_eq!(request.mode, PageMode::Dataverse);
        assembler.load(&request).await.unwrap();

        let requested = assembler.source().requested();
        assert_eq!(
            requested[0],
            "https://cdi.test/cdi?fileid=7&siteUrl=&datasetid=doi%3A10.1%2FX&datasetversion=&locale="
        );
        assert!(requested[1].ends_with("persistentId=doi%3A10.1%2FX"));
    }

    #[tokio::test]
    async fn test_dataverse_request_without_datasetid_skips_resource_map() {
        let source = StaticSource::new(xas_document(), json!({}));
        let assembler = DatasetAssembler::new(source, test_config());

        let request = LoadRequest::new(LoadParams::default(), PageMode::Dataverse);
        let dataset = assembler.load(&request).await.unwrap();

        assert_eq!(assembler.source().requested().len(), 1);
        assert_eq!(dataset.column_names(), vec!["energy", "i0"]);
    }

    #[tokio::test]
    async fn test_document_fetch_failure_is_an_error() {
        let assembler = DatasetAssembler::new(StaticSource::failing_document(500), test_config());
        let result = assembler.load(&complete_request()).await;
        assert!(matches!(
            result,
            Err(ImportError::Fetch(FetchError::Status { status: 500, .. }))
        ));
        // No resource map request after a failed document fetch
        assert_eq!(assembler.source().requested().len(), 1);
    }

    #[tokio::test]
    async fn test_study_metadata_and_enriched_label_columns() {
        let resource_map = json!({
            "results": [{
                "name": "Energy",
                "ollama_remote": {"ollama": "```json\n{\"definition\": \"Incident photon energy\", \"units\": \"eV\",}\n```"}
            }]
        });
        let source = StaticSource::new(xas_document(), resource_map);
        let assembler = DatasetAssembler::new(source, test_config());
        let dataset = assembler.load(&complete_request()).await.unwrap();

        assert_eq!(dataset.study_name, "Cu foil XAS");
        assert_eq!(dataset.study_description, "Copper K-edge transmission scan");
        assert_eq!(dataset.study_group_name, "Beamline 8-BM");
        assert_eq!(dataset.study_group_description, "Bending magnet beamline");
        assert_eq!(dataset.file_name, "Cu foil XAS");

        let energy = &dataset.columns[0];
        assert_eq!(energy.label, "energy (eV)");
        assert_eq!(energy.definition, "Incident photon energy");
        assert_eq!(energy.description, "Incident photon energy (eV)");
        assert_eq!(energy.type_id(), Some("Decimal"));

        let i0 = &dataset.columns[1];
        assert_eq!(i0.definition, "");
        assert_eq!(i0.description, "i0");
    }
}

mod fallback_tests {
    use super::*;

    #[tokio::test]
    async fn test_unlabelled_document_uses_resource_map_variables() {
        let resource_map = json!({
            "variables": [
                {"id": 101, "name": "Cases", "variableFormatType": "NUMERIC", "fileOrder": 2},
                {"id": 100, "name": "HealthZone", "variableFormatType": "CHARACTER", "fileOrder": 1},
                {"label": "Unnamed"}
            ],
            "results": [{
                "name": "healthzone",
                "ollama_remote": {"ollama": {"HealthZone": {"definition": "Administrative health zone"}}}
            }]
        });
        let source = StaticSource::new(unlabelled_document(), resource_map);
        let assembler = DatasetAssembler::new(source, test_config());
        let dataset = assembler.load(&complete_request()).await.unwrap();

        let summary: Vec<(usize, &str, Option<&str>)> = dataset
            .columns
            .iter()
            .map(|c| (c.position, c.id.as_str(), c.type_id()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (0, "100", Some("String")),
                (1, "101", Some("Decimal")),
                (2, "Unnamed", Some("Decimal")),
            ]
        );
        assert_eq!(dataset.columns[0].description, "Administrative health zone");
        // One resource map request serves both fallback and enrichment
        assert_eq!(assembler.source().requested().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_resource_map_gives_no_columns() {
        let source = StaticSource::new(unlabelled_document(), json!({}));
        let assembler = DatasetAssembler::new(source, test_config());
        let dataset = assembler.load(&complete_request()).await.unwrap();
        assert!(dataset.columns.is_empty());
        assert_eq!(dataset.study_name, "Survey");
    }

    #[tokio::test]
    async fn test_resource_map_failure_is_not_fatal() {
        let source = StaticSource {
            document: Ok(unlabelled_document()),
            resource_map: Err(FetchError::Network("connection reset".to_string())),
            requested: RefCell::new(Vec::new()),
        };
        let assembler = DatasetAssembler::new(source, test_config());
        let dataset = assembler.load(&complete_request()).await.unwrap();
        assert!(dataset.columns.is_empty());
    }

    #[tokio::test]
    async fn test_disabled_enrichment_and_fallback_skip_resource_map() {
        let mut config = test_config();
        config.enrichment.enabled = false;
        config.enrichment.fallback_enabled = false;
        let source = StaticSource::new(unlabelled_document(), json!({"variables": [{"name": "x"}]}));
        let assembler = DatasetAssembler::new(source, config);

        let dataset = assembler.load(&complete_request()).await.unwrap();
        assert!(dataset.columns.is_empty());
        assert_eq!(assembler.source().requested().len(), 1);
    }

    #[tokio::test]
    async fn test_fallback_without_enrichment() {
        let mut config = test_config();
        config.enrichment.enabled = false;
        let resource_map = json!({
            "variables": [{"name": "x", "variableMetadata": [{"definition": "unused"}]}]
        });
        let source = StaticSource::new(unlabelled_document(), resource_map);
        let assembler = DatasetAssembler::new(source, config);

        let dataset = assembler.load(&complete_request()).await.unwrap();
        assert_eq!(dataset.column_names(), vec!["x"]);
        assert_eq!(dataset.columns[0].definition, "");
    }
}

mod session_tests {
    use super::*;

    #[tokio::test]
    async fn test_failed_load_keeps_previous_dataset() {
        let mut session = DatasetSession::new();

        let good = DatasetAssembler::new(StaticSource::new(xas_document(), json!({})), test_config());
        session.load(&good, &complete_request()).await.unwrap();
        assert_eq!(session.current().unwrap().study_name, "Cu foil XAS");

        let bad = DatasetAssembler::new(StaticSource::failing_document(404), test_config());
        assert!(session.load(&bad, &complete_request()).await.is_err());
        assert_eq!(session.current().unwrap().study_name, "Cu foil XAS");
    }

    #[tokio::test]
    async fn test_successful_load_replaces_dataset() {
        let mut session = DatasetSession::new();
        let first = DatasetAssembler::new(StaticSource::new(xas_document(), json!({})), test_config());
        session.load(&first, &complete_request()).await.unwrap();

        let second = DatasetAssembler::new(
            StaticSource::new(unlabelled_document(), json!({})),
            test_config(),
        );
        let dataset = session.load(&second, &complete_request()).await.unwrap();
        assert_eq!(dataset.study_name, "Survey");
        assert!(dataset.columns.is_empty());
    }
}
