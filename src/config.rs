//! SDK configuration file support
//!
//! Handles parsing of `.cdi-metadata.toml` configuration files and
//! environment variable overrides.

use crate::jsonld::ExtractionCatalog;
use crate::jsonld::columns::{DEFAULT_PRIORITY_VARIABLES, DEFAULT_STRUCTURAL_NAMES};
use crate::remote::{DEFAULT_CDI_URL, DEFAULT_RESOURCEMAP_URL, Endpoints, LoadParams};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default configuration filename
pub const CONFIG_FILENAME: &str = ".cdi-metadata.toml";

/// Environment variable for the CDI endpoint
pub const ENV_CDI_URL: &str = "CDI_METADATA_CDI_URL";

/// Environment variable for the resource map endpoint
pub const ENV_RESOURCEMAP_URL: &str = "CDI_METADATA_RESOURCEMAP_URL";

/// Environment variable for the request timeout in seconds
pub const ENV_TIMEOUT_SECS: &str = "CDI_METADATA_TIMEOUT_SECS";

/// Environment variable toggling the enrichment pass
pub const ENV_ENRICHMENT: &str = "CDI_METADATA_ENRICHMENT";

/// Error loading or saving configuration
#[derive(Debug, thiserror::Error, serde::Serialize, serde::Deserialize)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Remote endpoint section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointsSection {
    #[serde(default = "default_cdi_url")]
    pub cdi_url: String,

    #[serde(default = "default_resourcemap_url")]
    pub resourcemap_url: String,

    /// Request timeout in seconds; unset means wait indefinitely
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_cdi_url() -> String {
    DEFAULT_CDI_URL.to_string()
}

fn default_resourcemap_url() -> String {
    DEFAULT_RESOURCEMAP_URL.to_string()
}

impl Default for EndpointsSection {
    fn default() -> Self {
        Self {
            cdi_url: default_cdi_url(),
            resourcemap_url: default_resourcemap_url(),
            timeout_secs: None,
        }
    }
}

/// Demonstration parameters used when a page passes an incomplete set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsSection {
    pub fileid: String,
    pub site_url: String,
    pub datasetid: String,
    pub datasetversion: String,
    pub locale: String,
}

impl Default for DefaultsSection {
    fn default() -> Self {
        let demo = LoadParams::demonstration();
        Self {
            fileid: demo.fileid.unwrap_or_default(),
            site_url: demo.site_url.unwrap_or_default(),
            datasetid: demo.datasetid.unwrap_or_default(),
            datasetversion: demo.datasetversion.unwrap_or_default(),
            locale: demo.locale.unwrap_or_default(),
        }
    }
}

impl DefaultsSection {
    pub fn to_params(&self) -> LoadParams {
        LoadParams {
            fileid: Some(self.fileid.clone()),
            site_url: Some(self.site_url.clone()),
            datasetid: Some(self.datasetid.clone()),
            datasetversion: Some(self.datasetversion.clone()),
            locale: Some(self.locale.clone()),
        }
    }
}

/// Column extraction section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionSection {
    #[serde(default = "default_priority_variables")]
    pub priority_variables: Vec<String>,

    #[serde(default = "default_structural_names")]
    pub structural_names: Vec<String>,
}

fn default_priority_variables() -> Vec<String> {
    DEFAULT_PRIORITY_VARIABLES
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_structural_names() -> Vec<String> {
    DEFAULT_STRUCTURAL_NAMES
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for ExtractionSection {
    fn default() -> Self {
        Self {
            priority_variables: default_priority_variables(),
            structural_names: default_structural_names(),
        }
    }
}

/// Enrichment section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentSection {
    /// Run the definition enrichment pass
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Take columns from the resource map when the document yields none
    #[serde(default = "default_true")]
    pub fallback_enabled: bool,
}

fn default_true() -> bool {
    true
}

impl Default for EnrichmentSection {
    fn default() -> Self {
        Self {
            enabled: true,
            fallback_enabled: true,
        }
    }
}

/// Main configuration structure
///
/// Represents the `.cdi-metadata.toml` configuration file format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SdkConfig {
    #[serde(default)]
    pub endpoints: EndpointsSection,

    #[serde(default)]
    pub defaults: DefaultsSection,

    #[serde(default)]
    pub extraction: ExtractionSection,

    #[serde(default)]
    pub enrichment: EnrichmentSection,
}

impl SdkConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a directory
    ///
    /// Looks for `.cdi-metadata.toml` in `dir`. Falls back to defaults if
    /// not found. Environment overrides are applied either way.
    pub fn load(dir: &Path) -> ConfigResult<Self> {
        let config_path = dir.join(CONFIG_FILENAME);
        if config_path.exists() {
            Self::load_file(&config_path)
        } else {
            let mut config = Self::default();
            config.apply_env_overrides();
            Ok(config)
        }
    }

    /// Load configuration from an explicit file path
    pub fn load_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::Io(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let mut config = Self::parse(&content)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> ConfigResult<Self> {
        toml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    /// Save configuration into a directory
    pub fn save(&self, dir: &Path) -> ConfigResult<()> {
        let content = self.to_toml()?;
        std::fs::write(dir.join(CONFIG_FILENAME), content)
            .map_err(|e| ConfigError::Io(format!("Failed to write config: {}", e)))
    }

    /// Convert configuration to TOML string
    pub fn to_toml(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialize(format!("Failed to serialize config: {}", e)))
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides read through `lookup`, keyed by the `ENV_*` names
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_CDI_URL) {
            self.endpoints.cdi_url = url;
        }

        if let Some(url) = lookup(ENV_RESOURCEMAP_URL) {
            self.endpoints.resourcemap_url = url;
        }

        if let Some(secs) = lookup(ENV_TIMEOUT_SECS)
            && let Ok(secs) = secs.parse()
        {
            self.endpoints.timeout_secs = Some(secs);
        }

        if let Some(flag) = lookup(ENV_ENRICHMENT)
            && let Some(enabled) = parse_flag(&flag)
        {
            self.enrichment.enabled = enabled;
        }
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints {
            cdi_url: self.endpoints.cdi_url.clone(),
            resourcemap_url: self.endpoints.resourcemap_url.clone(),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.endpoints.timeout_secs.map(Duration::from_secs)
    }

    pub fn extraction_catalog(&self) -> ExtractionCatalog {
        ExtractionCatalog {
            priority_variables: self.extraction.priority_variables.clone(),
            structural_names: self.extraction.structural_names.clone(),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Generate a sample configuration file content
pub fn sample_config() -> &'static str {
    r#"# CDI Metadata SDK Configuration

[endpoints]
# Service converting Dataverse files to CDI JSON-LD
cdi_url = "https://cdif-4-xas.dev.codata.org/cdi"

# Dataverse export endpoint serving resource maps
resourcemap_url = "https://dataverse.dev.codata.org/api/datasets/export"

# Request timeout in seconds (unset: no timeout)
# timeout_secs = 30

[defaults]
# Parameters used when a request does not supply all five
fileid = "38"
site_url = "https://dataverse.dev.codata.org"
datasetid = "doi:10.5072/FK2/4ZSKVU"
datasetversion = "3.0"
locale = "en"

[extraction]
# Ranking applied to xdi dictionary variables
priority_variables = ["energy", "i0", "itrans", "mutrans", "ifluor", "mufluor", "irefer", "murefer", "normtrans", "normfluor", "normrefer", "k", "chi", "chi_mag", "chi_pha", "chi_re", "chi_im", "r", "angle"]

# xdi dictionary entries that are never variables
structural_names = ["Beamline", "detector", "facility", "scan", "Sample", "Element", "Mono", "Column", "variables", "monochormator"]

[enrichment]
# Copy resource map definitions into columns
enabled = true

# Take columns from the resource map when the document has none
fallback_enabled = true
"#
}
