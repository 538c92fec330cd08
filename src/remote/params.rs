//! Load parameters, page modes and endpoint URL templating.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// CDI conversion endpoint
pub const DEFAULT_CDI_URL: &str = "https://cdif-4-xas.dev.codata.org/cdi";

/// Dataverse dataset export endpoint
pub const DEFAULT_RESOURCEMAP_URL: &str = "https://dataverse.dev.codata.org/api/datasets/export";

/// Path fragment that marks an embedded Dataverse page
pub const DATAVERSE_PATH_MARKER: &str = "/dataverse";

/// Parses a query string into a flat map.
///
/// A leading `?` is ignored, empty pairs are skipped, and keys and values
/// are percent-decoded. A pair without `=` maps to an empty value; only
/// the first `=` splits. Later duplicates win.
pub fn parse_query_params(query: &str) -> HashMap<String, String> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let mut parts = pair.splitn(2, '=');
            let key = parts.next().unwrap_or_default();
            let value = parts.next().unwrap_or_default();
            (decode(key), decode(value))
        })
        .collect()
}

fn decode(text: &str) -> String {
    urlencoding::decode(text)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| text.to_string())
}

/// The five parameters the CDI endpoint takes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadParams {
    #[serde(default)]
    pub fileid: Option<String>,
    #[serde(default)]
    pub site_url: Option<String>,
    #[serde(default)]
    pub datasetid: Option<String>,
    #[serde(default)]
    pub datasetversion: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
}

impl LoadParams {
    /// Demonstration parameters used when a page supplies an incomplete set
    pub fn demonstration() -> Self {
        Self {
            fileid: Some("38".to_string()),
            site_url: Some("https://dataverse.dev.codata.org".to_string()),
            datasetid: Some("doi:10.5072/FK2/4ZSKVU".to_string()),
            datasetversion: Some("3.0".to_string()),
            locale: Some("en".to_string()),
        }
    }

    /// Reads the parameters out of a parsed query map. Empty values count
    /// as missing.
    pub fn from_query(query: &HashMap<String, String>) -> Self {
        let get = |key: &str| query.get(key).filter(|v| !v.is_empty()).cloned();
        Self {
            fileid: get("fileid"),
            site_url: get("siteUrl"),
            datasetid: get("datasetid"),
            datasetversion: get("datasetversion"),
            locale: get("locale"),
        }
    }

    fn fields(&self) -> [(&'static str, Option<&str>); 5] {
        [
            ("fileid", self.fileid.as_deref()),
            ("siteUrl", self.site_url.as_deref()),
            ("datasetid", self.datasetid.as_deref()),
            ("datasetversion", self.datasetversion.as_deref()),
            ("locale", self.locale.as_deref()),
        ]
    }

    /// Whether all five parameters are present and non-empty.
    pub fn is_complete(&self) -> bool {
        self.fields()
            .iter()
            .all(|(_, v)| v.is_some_and(|s| !s.is_empty()))
    }

    /// Dataset persistent identifier, or an empty string.
    pub fn persistent_id(&self) -> &str {
        self.datasetid.as_deref().unwrap_or_default()
    }

    /// Query string with every value percent-encoded; missing values are
    /// empty.
    pub fn to_query_string(&self) -> String {
        self.fields()
            .iter()
            .map(|(key, value)| {
                format!("{}={}", key, urlencoding::encode(value.unwrap_or_default()))
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// How a page asks for its document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageMode {
    /// Use the page parameters when complete, else the demonstration set
    #[default]
    Standalone,
    /// Always use the page parameters, missing ones as empty strings
    Dataverse,
}

impl PageMode {
    pub fn from_path(path: &str) -> Self {
        if path.contains(DATAVERSE_PATH_MARKER) {
            Self::Dataverse
        } else {
            Self::Standalone
        }
    }
}

/// Parameters and mode of one load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadRequest {
    pub params: LoadParams,
    pub mode: PageMode,
}

impl LoadRequest {
    pub fn new(params: LoadParams, mode: PageMode) -> Self {
        Self { params, mode }
    }

    /// Builds a request from a page path and its query string.
    pub fn from_page(path: &str, query: &str) -> Self {
        Self {
            params: LoadParams::from_query(&parse_query_params(query)),
            mode: PageMode::from_path(path),
        }
    }

    /// The parameters the load actually uses.
    pub fn effective_params(&self, defaults: &LoadParams) -> LoadParams {
        match self.mode {
            PageMode::Dataverse => self.params.clone(),
            PageMode::Standalone if self.params.is_complete() => self.params.clone(),
            PageMode::Standalone => defaults.clone(),
        }
    }
}

/// Base URLs of the two remote services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    pub cdi_url: String,
    pub resourcemap_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            cdi_url: DEFAULT_CDI_URL.to_string(),
            resourcemap_url: DEFAULT_RESOURCEMAP_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// URL of the primary document for `params`.
    pub fn document_url(&self, params: &LoadParams) -> String {
        format!("{}?{}", self.cdi_url, params.to_query_string())
    }

    /// URL of the resource map for a persistent identifier. The `doi:`
    /// prefix is kept and encoded along with the rest.
    pub fn resourcemap_url(&self, persistent_id: &str) -> String {
        format!(
            "{}?exporter=resourcemap&persistentId={}",
            self.resourcemap_url,
            urlencoding::encode(persistent_id)
        )
    }
}
