//! Configuration schema for folio.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Root config for the folio CLI and client.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FolioConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    #[serde(default)]
    pub endpoint: EndpointConfig,
    /// Document definitions added to, or overriding, the built-in catalog.
    #[serde(default)]
    pub documents: Vec<DocumentConfig>,
}

impl FolioConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> FolioConfigBuilder {
        FolioConfigBuilder::new()
    }

    /// Document entry by name.
    pub fn document(&self, name: &str) -> Option<&DocumentConfig> {
        self.documents.iter().find(|document| document.name == name)
    }
}

/// Builder for assembling a `FolioConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct FolioConfigBuilder {
    config: FolioConfig,
}

impl FolioConfigBuilder {
    /// Create a new builder seeded with default config values.
    pub fn new() -> Self {
        Self {
            config: FolioConfig::default(),
        }
    }

    /// Replace the endpoint settings.
    pub fn endpoint(mut self, endpoint: EndpointConfig) -> Self {
        self.config.endpoint = endpoint;
        self
    }

    /// Override only the endpoint base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.endpoint.base_url = base_url.into();
        self
    }

    /// Append a document definition.
    pub fn document(mut self, document: DocumentConfig) -> Self {
        self.config.documents.push(document);
        self
    }

    /// Finalize the config.
    pub fn build(self) -> FolioConfig {
        self.config
    }
}

/// Where and how to reach the record endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EndpointConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Bearer token sent with every request.
    #[serde(default)]
    pub token: Option<String>,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            token: None,
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// One editable document.
///
/// Entries named after a built-in definition override only the fields they
/// set; any other name must provide its own `api_path`, `type`, `subtype`,
/// and `defaults`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DocumentConfig {
    pub name: String,
    #[serde(default)]
    pub api_path: Option<String>,
    #[serde(default, rename = "type")]
    pub record_type: Option<String>,
    #[serde(default)]
    pub subtype: Option<String>,
    /// Array paths that keep their default items when the stored list is empty.
    #[serde(default)]
    pub array_fallback: Vec<String>,
    #[serde(default)]
    pub attachment_naming: Option<AttachmentNamingConfig>,
    /// Default shape; must be an object.
    #[serde(default)]
    pub defaults: Option<Value>,
}

impl DocumentConfig {
    /// Entry with only a name; every other field falls back.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// How staged attachments are named in multipart requests.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentNamingConfig {
    /// `file:<path>`.
    Path,
    /// `<field>Image<index>` for paths inside a list.
    Indexed,
}
