pub mod credentials;

use crate::error::{BlobFlowError, Result};
use crate::types::{FailureReporting, NodeKind};
use credentials::{CredentialField, Credentials};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Flow file stored as TOML: the process-wide fallback plus node instances.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlowConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blob_storage: Option<BlobStorageSection>,
    #[serde(default)]
    pub nodes: Vec<NodeConfig>,
}

/// Process-wide account defaults used when a node leaves them blank.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobStorageSection {
    #[serde(default)]
    pub accountname: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
}

impl fmt::Debug for BlobStorageSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlobStorageSection")
            .field("accountname", &self.accountname)
            .field("key", &self.key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl BlobStorageSection {
    /// Same-named lookup; the section has no container or blob defaults.
    pub fn get(&self, field: CredentialField) -> Option<&str> {
        match field {
            CredentialField::AccountName => self.accountname.as_deref(),
            CredentialField::Key => self.key.as_deref(),
            CredentialField::Container | CredentialField::Blob => None,
        }
    }

    /// Section built from `AZURE_STORAGE_ACCOUNT` / `AZURE_STORAGE_KEY`.
    pub fn from_env() -> Option<Self> {
        let accountname = std::env::var("AZURE_STORAGE_ACCOUNT").ok();
        let key = std::env::var("AZURE_STORAGE_KEY").ok();
        if accountname.is_none() && key.is_none() {
            return None;
        }
        Some(Self { accountname, key })
    }
}

/// One configured node instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default)]
    pub name: Option<String>,
    /// Forward an error message downstream when an operation fails.
    #[serde(default)]
    pub send_error: bool,
    #[serde(default)]
    pub failure_reporting: FailureReporting,
    /// Directory for derived download destinations (default: current dir).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_dir: Option<PathBuf>,
    #[serde(default)]
    pub credentials: Credentials,
}

impl NodeConfig {
    pub fn new(id: &str, kind: NodeKind) -> Self {
        Self {
            id: id.to_string(),
            kind,
            name: None,
            credentials: Credentials::default(),
            send_error: false,
            failure_reporting: FailureReporting::default(),
            work_dir: None,
        }
    }

    /// Configured name, or the kind's default display name.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| self.kind.default_name())
    }
}

impl FlowConfig {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(BlobFlowError::ConfigNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| BlobFlowError::TomlDe(e.to_string()))
    }

    /// Save config to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| BlobFlowError::TomlSer(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Default config for `blobflow init`: empty fallback and one node per kind.
    pub fn default_config() -> Self {
        Self {
            blob_storage: Some(BlobStorageSection::default()),
            nodes: NodeKind::ALL
                .iter()
                .map(|kind| {
                    let id = kind.type_name().to_lowercase().replace(' ', "-");
                    NodeConfig::new(&id, *kind)
                })
                .collect(),
        }
    }

    /// Fill unset `[blob_storage]` fields from the environment.
    pub fn with_env_fallback(self) -> Self {
        self.with_fallback(BlobStorageSection::from_env())
    }

    /// Fill unset or empty `[blob_storage]` fields from `defaults`. Values
    /// already in the file win.
    pub fn with_fallback(mut self, defaults: Option<BlobStorageSection>) -> Self {
        let Some(defaults) = defaults else {
            return self;
        };
        let section = self.blob_storage.get_or_insert_with(Default::default);
        fill(&mut section.accountname, defaults.accountname);
        fill(&mut section.key, defaults.key);
        self
    }

    pub fn node(&self, id: &str) -> Result<&NodeConfig> {
        self.nodes
            .iter()
            .find(|n| n.id == id)
            .ok_or_else(|| BlobFlowError::NodeNotFound(id.to_string()))
    }

    /// Resolve the config file path: `<base_dir>/blobflow.toml`
    pub fn default_path(base_dir: &Path) -> PathBuf {
        base_dir.join("blobflow.toml")
    }

    /// Resolve the default blobflow home directory: `~/.blobflow`
    pub fn default_base_dir() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|h| h.join(".blobflow"))
            .ok_or_else(|| BlobFlowError::Config("Cannot determine home directory".to_string()))
    }
}

fn fill(slot: &mut Option<String>, value: Option<String>) {
    if slot.as_deref().is_none_or(str::is_empty) {
        *slot = value.filter(|v| !v.is_empty()).or(slot.take());
    }
}
