//! Remote metadata sources
//!
//! Two documents are fetched over the network: the primary CDI JSON-LD
//! document and the Dataverse resource map. Both sit behind the
//! [`MetadataSource`] trait so the assembler can run against HTTP, a
//! browser fetch, or an in-memory fixture.

#[cfg(feature = "api-backend")]
pub mod http;
pub mod params;

#[cfg(feature = "api-backend")]
pub use http::HttpMetadataSource;
pub use params::{
    DEFAULT_CDI_URL, DEFAULT_RESOURCEMAP_URL, Endpoints, LoadParams, LoadRequest, PageMode,
    parse_query_params,
};

use async_trait::async_trait;
use serde_json::Value;

/// Error while fetching a remote document
#[derive(Debug, Clone, PartialEq, thiserror::Error, serde::Serialize, serde::Deserialize)]
pub enum FetchError {
    /// The server answered with a non-success status
    #[error("Request to {url} failed with status {status}")]
    Status { url: String, status: u16 },
    /// The request never produced a response
    #[error("Network error: {0}")]
    Network(String),
    /// The response body was not JSON
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

/// Source of CDI documents and resource maps.
///
/// Calls are sequential within one load; implementations need not be
/// thread-safe.
#[async_trait(?Send)]
pub trait MetadataSource {
    /// Fetch the primary JSON-LD document at `url`.
    async fn fetch_document(&self, url: &str) -> Result<Value, FetchError>;

    /// Fetch a resource map at `url`.
    async fn fetch_resource_map(&self, url: &str) -> Result<Value, FetchError>;
}
