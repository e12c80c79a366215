use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use blobflow_core::config::FlowConfig;
use blobflow_core::message::{Message, Payload};
use blobflow_nodes::NodeRegistry;
use blobflow_storage::factory::{StoreFactory, StoreTarget};

use crate::host::ConsoleHost;

pub struct SendArgs {
    pub node: String,
    pub payload: Option<String>,
    pub payload_file: Option<PathBuf>,
    pub container: Option<String>,
    pub blob: Option<String>,
    pub local: Option<PathBuf>,
    pub emulator: bool,
}

impl SendArgs {
    fn target(&self) -> StoreTarget {
        match (&self.local, self.emulator) {
            (Some(dir), _) => StoreTarget::Local(dir.clone()),
            (None, true) => StoreTarget::Emulator,
            (None, false) => StoreTarget::Azure,
        }
    }

    fn message(&self) -> Result<Message> {
        let payload = match (&self.payload, &self.payload_file) {
            (Some(text), _) => Some(Payload::Text(text.clone())),
            (None, Some(path)) => Some(Payload::Bytes(std::fs::read(path)?)),
            (None, None) => None,
        };
        Ok(Message {
            payload,
            container_name: self.container.clone(),
            blob_name: self.blob.clone(),
            ..Default::default()
        })
    }
}

pub async fn run(base_dir: &Path, args: SendArgs) -> Result<()> {
    let config_path = FlowConfig::default_path(base_dir);
    let config = FlowConfig::load(&config_path)?.with_env_fallback();
    let node_config = config.node(&args.node)?.clone();

    let factory: Arc<dyn StoreFactory> = Arc::new(args.target());
    let node = NodeRegistry::with_blob_nodes().create(
        node_config,
        config.blob_storage.as_ref(),
        factory,
    )?;
    tracing::debug!(?node, "node ready");

    let host = ConsoleHost::new(node.id());
    let msg = args.message()?;
    node.on_input(msg, &host).await;
    node.close(&host);

    Ok(())
}
