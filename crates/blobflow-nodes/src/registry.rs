use std::collections::BTreeMap;
use std::sync::Arc;

use blobflow_core::config::credentials::CredentialField;
use blobflow_core::config::{BlobStorageSection, NodeConfig};
use blobflow_core::error::{BlobFlowError, Result};
use blobflow_core::types::NodeKind;
use blobflow_storage::factory::StoreFactory;

use crate::node::BlobNode;

/// What a host needs to offer a node type in its configuration UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDefinition {
    pub kind: NodeKind,
    pub type_name: &'static str,
    pub default_name: &'static str,
    pub credential_fields: &'static [CredentialField],
}

impl NodeDefinition {
    pub fn for_kind(kind: NodeKind) -> Self {
        Self {
            kind,
            type_name: kind.type_name(),
            default_name: kind.default_name(),
            credential_fields: &CredentialField::ALL,
        }
    }
}

/// Node types known to a host, keyed by type name.
#[derive(Debug, Default)]
pub struct NodeRegistry {
    types: BTreeMap<&'static str, NodeDefinition>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every blob node type.
    pub fn with_blob_nodes() -> Self {
        let mut registry = Self::new();
        for kind in NodeKind::ALL {
            registry.register(NodeDefinition::for_kind(kind));
        }
        registry
    }

    pub fn register(&mut self, definition: NodeDefinition) {
        tracing::debug!(type_name = definition.type_name, "registered node type");
        self.types.insert(definition.type_name, definition);
    }

    pub fn get(&self, type_name: &str) -> Option<&NodeDefinition> {
        self.types.get(type_name)
    }

    pub fn definitions(&self) -> impl Iterator<Item = &NodeDefinition> {
        self.types.values()
    }

    /// Create a node instance from its configuration.
    pub fn create(
        &self,
        config: NodeConfig,
        fallback: Option<&BlobStorageSection>,
        factory: Arc<dyn StoreFactory>,
    ) -> Result<BlobNode> {
        if self.get(config.kind.type_name()).is_none() {
            return Err(BlobFlowError::UnknownNodeType(
                config.kind.type_name().to_string(),
            ));
        }
        Ok(BlobNode::new(config, fallback, factory))
    }
}
