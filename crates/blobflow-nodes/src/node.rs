use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use blobflow_core::config::credentials::{pick_target, AccountInfo, CredentialField};
use blobflow_core::config::{BlobStorageSection, NodeConfig};
use blobflow_core::error::{BlobFlowError, Result};
use blobflow_core::host::NodeHost;
use blobflow_core::message::Message;
use blobflow_core::status::OperationStatus;
use blobflow_core::types::{FailureReporting, NodeKind};
use blobflow_storage::factory::StoreFactory;
use blobflow_storage::store::BlobStore;

use crate::{delete, download, upload};

/// One configured node instance.
///
/// The account is resolved once at creation. The storage client is built on
/// the first input and kept until [`BlobNode::close`]; it belongs to this
/// instance only.
pub struct BlobNode {
    config: NodeConfig,
    account: AccountInfo,
    work_dir: PathBuf,
    factory: Arc<dyn StoreFactory>,
    client: Mutex<Option<Arc<dyn BlobStore>>>,
}

impl BlobNode {
    pub fn new(
        config: NodeConfig,
        fallback: Option<&BlobStorageSection>,
        factory: Arc<dyn StoreFactory>,
    ) -> Self {
        let account = AccountInfo::resolve(&config.credentials, fallback);
        let work_dir = config
            .work_dir
            .clone()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));
        tracing::debug!(node = %config.id, kind = %config.kind, ?account, "node created");
        Self {
            config,
            account,
            work_dir,
            factory,
            client: Mutex::new(None),
        }
    }

    pub fn id(&self) -> &str {
        &self.config.id
    }

    pub fn kind(&self) -> NodeKind {
        self.config.kind
    }

    pub fn name(&self) -> &str {
        self.config.display_name()
    }

    pub fn account(&self) -> &AccountInfo {
        &self.account
    }

    pub fn is_connected(&self) -> bool {
        self.client.lock().map(|c| c.is_some()).unwrap_or(false)
    }

    fn client(&self) -> Result<Arc<dyn BlobStore>> {
        let mut slot = self
            .client
            .lock()
            .map_err(|_| BlobFlowError::Client("client lock poisoned".to_string()))?;
        if let Some(client) = slot.as_ref() {
            return Ok(Arc::clone(client));
        }
        let client = self.factory.connect(&self.account)?;
        tracing::debug!(node = %self.config.id, store = client.name(), "storage client created");
        *slot = Some(Arc::clone(&client));
        Ok(client)
    }

    fn container(&self, msg: &Message) -> Result<String> {
        pick_target(
            self.config.credentials.get(CredentialField::Container),
            msg.container_name.as_deref(),
        )
        .ok_or(BlobFlowError::MissingTarget("container"))
    }

    fn blob(&self, msg: &Message) -> Result<String> {
        pick_target(
            self.config.credentials.get(CredentialField::Blob),
            msg.blob_name.as_deref(),
        )
        .ok_or(BlobFlowError::MissingTarget("blob"))
    }

    /// Whether completion is signalled to the host for this node.
    fn signals_done(&self) -> bool {
        self.config.kind == NodeKind::DownloadToBuffer
            || self.config.failure_reporting == FailureReporting::Uniform
    }

    /// Handle one inbound message.
    pub async fn on_input(&self, msg: Message, host: &dyn NodeHost) {
        let (working, finished) = match self.config.kind {
            NodeKind::Upload | NodeKind::Delete => (OperationStatus::Sending, OperationStatus::Sent),
            NodeKind::DownloadToFile | NodeKind::DownloadToBuffer => {
                (OperationStatus::Receiving, OperationStatus::Received)
            }
        };
        host.status(working.indicator());

        match self.run(&msg, host).await {
            Ok(out) => {
                host.status(finished.indicator());
                host.send(out);
                if self.signals_done() {
                    host.done(None);
                }
            }
            Err(err) => self.fail(err, &msg, host),
        }
    }

    /// Target names are resolved before the client is built, so a message
    /// missing them never connects.
    async fn run(&self, msg: &Message, host: &dyn NodeHost) -> Result<Message> {
        let container = self.container(msg)?;

        match self.config.kind {
            NodeKind::Upload => {
                let source = msg
                    .payload
                    .as_ref()
                    .ok_or(BlobFlowError::MissingTarget("payload"))?;
                let blob = upload::blob_name(
                    self.config.credentials.get(CredentialField::Blob),
                    msg.blob_name.as_deref(),
                    Some(source),
                )
                .ok_or(BlobFlowError::MissingTarget("blob"))?;
                let store = self.client()?;
                host.log("Uploading blob...");
                upload::upload(store.as_ref(), &container, &blob, source).await?;
                host.log(&format!(
                    "Blob '{blob}' uploaded in container '{container}'"
                ));
                Ok(msg.clone())
            }
            NodeKind::DownloadToFile => {
                let blob = self.blob(msg)?;
                let dest = download::destination(msg.payload.as_ref(), &blob, &self.work_dir);
                let store = self.client()?;
                host.log(&format!("Downloading blob to {}", dest.display()));
                download::to_file(store.as_ref(), &container, &blob, &dest).await?;
                host.log(&format!(
                    "Blob '{blob}' is downloaded successfully at '{}'",
                    dest.parent().unwrap_or(self.work_dir.as_path()).display()
                ));
                Ok(msg.clone())
            }
            NodeKind::DownloadToBuffer => {
                let blob = self.blob(msg)?;
                let store = self.client()?;
                host.log("Downloading blob...");
                let buffer = download::to_buffer(store.as_ref(), &container, &blob).await?;
                let mut out = msg.clone();
                out.payload = Some(buffer.into());
                Ok(out)
            }
            NodeKind::Delete => {
                let blob = self.blob(msg)?;
                let store = self.client()?;
                host.log("Deleting blob");
                delete::delete(store.as_ref(), &container, &blob).await?;
                host.log(delete::DELETED);
                Ok(Message::text(delete::DELETED))
            }
        }
    }

    fn fail(&self, err: BlobFlowError, msg: &Message, host: &dyn NodeHost) {
        tracing::warn!(
            node = %self.config.id,
            kind = %self.config.kind,
            error = %err,
            "operation failed"
        );
        host.error(&err.to_string(), Some(msg));
        host.status(OperationStatus::Error.indicator());

        if !self.signals_done() {
            return;
        }
        if self.config.send_error {
            host.send(msg.error_reply(&err));
        }
        host.done(Some(&err));
    }

    /// Drop the storage client and show the node as disconnected.
    ///
    /// Operations already in flight keep their own handle and still report
    /// when they finish.
    pub fn close(&self, host: &dyn NodeHost) {
        let previous = self.client.lock().ok().and_then(|mut slot| slot.take());
        if previous.is_some() {
            tracing::info!(node = %self.config.id, "disconnecting storage client");
            host.log("Disconnecting from Azure");
        }
        host.status(OperationStatus::Disconnected.indicator());
    }
}

impl std::fmt::Debug for BlobNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobNode")
            .field("id", &self.config.id)
            .field("kind", &self.config.kind)
            .field("account", &self.account)
            .field("work_dir", &self.work_dir)
            .finish_non_exhaustive()
    }
}
