//! HTTP metadata source tests against a mock server

#![cfg(feature = "api-backend")]

use cdi_metadata_sdk::config::SdkConfig;
use cdi_metadata_sdk::import::DatasetAssembler;
use cdi_metadata_sdk::remote::{FetchError, HttpMetadataSource, LoadRequest, MetadataSource};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod http_source_tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_document_returns_json() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cdi"))
            .and(query_param("fileid", "38"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"@graph": []})))
            .mount(&mock_server)
            .await;

        let source = HttpMetadataSource::new();
        let url = format!("{}/cdi?fileid=38", mock_server.uri());
        let document = source.fetch_document(&url).await.unwrap();
        assert_eq!(document, json!({"@graph": []}));
    }

    #[tokio::test]
    async fn test_non_success_status_is_reported() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cdi"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let url = format!("{}/cdi", mock_server.uri());
        let err = HttpMetadataSource::new()
            .fetch_document(&url)
            .await
            .unwrap_err();
        assert_eq!(err, FetchError::Status { url, status: 404 });
    }

    #[tokio::test]
    async fn test_invalid_body_is_a_decode_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/export"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&mock_server)
            .await;

        let url = format!("{}/export", mock_server.uri());
        let err = HttpMetadataSource::new()
            .fetch_resource_map(&url)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[tokio::test]
    async fn test_slow_response_hits_timeout() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cdi"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&mock_server)
            .await;

        let source = HttpMetadataSource::with_timeout(Some(Duration::from_millis(100)));
        let url = format!("{}/cdi", mock_server.uri());
        let err = source.fetch_document(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Network(_)));
    }
}

mod assembler_http_tests {
    use super::*;

    #[tokio::test]
    async fn test_load_over_http_with_fallback_and_enrichment() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cdi"))
            .and(query_param("fileid", "12"))
            .and(query_param("siteUrl", "https://dv.test"))
            .and(query_param("datasetid", "doi:10.5072/FK2/ABC"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "@graph": [
                    {"@id": "https://doi.org/10.5072/FK2/ABC", "@type": "schema:Dataset", "name": "Survey"}
                ]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/datasets/export"))
            .and(query_param("exporter", "resourcemap"))
            .and(query_param("persistentId", "doi:10.5072/FK2/ABC"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "variables": [
                    {"id": 1, "name": "HealthZone", "variableFormatType": "CHARACTER", "fileOrder": 1}
                ],
                "results": [{
                    "name": "HealthZone",
                    "ollama_remote": {"ollama": "{\"definition\": \"Administrative health zone\", \"units\": \"n/a\"}"}
                }]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut config = SdkConfig::default();
        config.endpoints.cdi_url = format!("{}/cdi", mock_server.uri());
        config.endpoints.resourcemap_url = format!("{}/api/datasets/export", mock_server.uri());
        let source = HttpMetadataSource::with_timeout(config.timeout());
        let assembler = DatasetAssembler::new(source, config);

        let request = LoadRequest::from_page(
            "/cdi.html",
            "fileid=12&siteUrl=https%3A%2F%2Fdv.test&datasetid=doi%3A10.5072%2FFK2%2FABC&datasetversion=1.0&locale=en",
        );
        let dataset = assembler.load(&request).await.unwrap();

        assert_eq!(dataset.study_name, "Survey");
        assert_eq!(dataset.column_names(), vec!["HealthZone"]);
        assert_eq!(dataset.columns[0].type_id(), Some("String"));
        assert_eq!(
            dataset.columns[0].description,
            "Administrative health zone (n/a)"
        );
    }

    #[tokio::test]
    async fn test_load_fails_when_document_is_unavailable() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cdi"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let mut config = SdkConfig::default();
        config.endpoints.cdi_url = format!("{}/cdi", mock_server.uri());
        let assembler = DatasetAssembler::new(HttpMetadataSource::new(), config);

        let result = assembler.load(&LoadRequest::default()).await;
        assert!(result.is_err());
    }
}
