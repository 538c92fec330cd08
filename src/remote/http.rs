//! HTTP metadata source built on reqwest.

use super::{FetchError, MetadataSource};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

/// Fetches documents over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpMetadataSource {
    client: Client,
    /// Ignored on wasm32
    #[cfg_attr(target_arch = "wasm32", allow(dead_code))]
    timeout: Option<Duration>,
}

impl Default for HttpMetadataSource {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpMetadataSource {
    /// Source without a request timeout.
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            timeout: None,
        }
    }

    /// Source whose requests give up after `timeout`.
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self {
            client: Client::new(),
            timeout,
        }
    }

    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        debug!("GET {}", url);
        #[cfg_attr(target_arch = "wasm32", allow(unused_mut))]
        let mut request = self.client.get(url);
        #[cfg(not(target_arch = "wasm32"))]
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[async_trait(?Send)]
impl MetadataSource for HttpMetadataSource {
    async fn fetch_document(&self, url: &str) -> Result<Value, FetchError> {
        info!("Loading JSON-LD from {}", url);
        self.get_json(url).await
    }

    async fn fetch_resource_map(&self, url: &str) -> Result<Value, FetchError> {
        info!("Loading resource map from {}", url);
        self.get_json(url).await
    }
}
