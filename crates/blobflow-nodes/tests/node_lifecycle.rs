//! End-to-end behaviour of the blob nodes against a local store and a
//! scripted store, observed through a recording host.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use futures::stream;

use blobflow_core::config::NodeConfig;
use blobflow_core::message::{Message, Payload};
use blobflow_core::testing::RecordingHost;
use blobflow_core::types::{FailureReporting, NodeKind};
use blobflow_nodes::{BlobNode, NodeRegistry};
use blobflow_storage::factory::{StoreFactory, StoreTarget};
use blobflow_storage::local::LocalBlobStore;
use blobflow_storage::store::{BlobStore, ChunkStream};
use tempfile::TempDir;
use tokio::sync::Notify;

fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .with_test_writer()
        .try_init();
}

fn local_node(config: NodeConfig, store_dir: &Path) -> BlobNode {
    let factory: Arc<dyn StoreFactory> = Arc::new(StoreTarget::Local(store_dir.to_path_buf()));
    NodeRegistry::with_blob_nodes()
        .create(config, None, factory)
        .unwrap()
}

fn scripted_node(config: NodeConfig, store: Arc<ScriptedStore>) -> BlobNode {
    let store: Arc<dyn BlobStore> = store;
    let factory: Arc<dyn StoreFactory> = Arc::new(store);
    NodeRegistry::with_blob_nodes()
        .create(config, None, factory)
        .unwrap()
}

/// Store whose answers are fixed up front; records the calls it receives.
#[derive(Default)]
struct ScriptedStore {
    chunks: Vec<&'static [u8]>,
    fail_container: bool,
    fail_stream_after: Option<usize>,
    /// `delete_blob` signals `started`, then waits on `release`.
    gate: Option<(Arc<Notify>, Arc<Notify>)>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedStore {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl BlobStore for ScriptedStore {
    async fn create_container_if_not_exists(&self, container: &str) -> anyhow::Result<bool> {
        self.record(format!("create_container {container}"));
        if self.fail_container {
            anyhow::bail!("AuthenticationFailed");
        }
        Ok(true)
    }

    async fn upload_bytes(
        &self,
        container: &str,
        blob: &str,
        _data: Vec<u8>,
    ) -> anyhow::Result<()> {
        self.record(format!("upload {container}/{blob}"));
        Ok(())
    }

    fn read_stream(&self, container: &str, blob: &str) -> ChunkStream {
        self.record(format!("read {container}/{blob}"));
        let mut items: Vec<anyhow::Result<Bytes>> = self
            .chunks
            .iter()
            .copied()
            .map(|c| Ok(Bytes::from_static(c)))
            .collect();
        if let Some(n) = self.fail_stream_after {
            items.truncate(n);
            items.push(Err(anyhow::anyhow!("connection reset")));
        }
        stream::iter(items).boxed()
    }

    async fn delete_blob(&self, container: &str, blob: &str) -> anyhow::Result<()> {
        self.record(format!("delete {container}/{blob}"));
        if let Some((started, release)) = &self.gate {
            started.notify_one();
            release.notified().await;
        }
        Ok(())
    }

    async fn test_connection(&self) -> anyhow::Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

#[tokio::test]
async fn upload_creates_container_and_forwards_message() {
    init_test_tracing();
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("a.txt");
    std::fs::write(&source, b"report body").unwrap();

    let mut config = NodeConfig::new("up", NodeKind::Upload);
    config.credentials.container = Some("c".to_string());
    let node = local_node(config, &tmp.path().join("store"));
    let host = RecordingHost::new();

    let msg = Message::new(source.display().to_string()).with_blob(source.display().to_string());
    node.on_input(msg.clone(), &host).await;

    assert_eq!(host.statuses(), vec!["Sending", "Sent message"]);
    assert_eq!(host.sent(), vec![msg]);
    assert!(host.done_calls().is_empty());
    assert_eq!(
        std::fs::read(tmp.path().join("store/c/a.txt")).unwrap(),
        b"report body"
    );
}

#[tokio::test]
async fn upload_stops_when_container_cannot_be_created() {
    let store = Arc::new(ScriptedStore {
        fail_container: true,
        ..Default::default()
    });
    let node = scripted_node(NodeConfig::new("up", NodeKind::Upload), Arc::clone(&store));
    let host = RecordingHost::new();

    let msg = Message::new("/tmp/a.txt").with_container("c");
    node.on_input(msg, &host).await;

    assert_eq!(store.calls(), vec!["create_container c"]);
    assert_eq!(host.last_status(), Some("Error"));
    assert!(host.sent().is_empty());
    assert!(host.errors()[0].contains("Could not create container 'c'"));
}

#[tokio::test]
async fn upload_of_raw_bytes_uses_message_blob_base_name() {
    let store = Arc::new(ScriptedStore::default());
    let node = scripted_node(NodeConfig::new("up", NodeKind::Upload), Arc::clone(&store));
    let host = RecordingHost::new();

    let msg = Message::new(b"raw".to_vec())
        .with_container("c")
        .with_blob("nested/dir/raw.bin");
    node.on_input(msg, &host).await;

    assert_eq!(
        store.calls(),
        vec!["create_container c", "upload c/raw.bin"]
    );
    assert_eq!(host.last_status(), Some("Sent message"));
}

#[tokio::test]
async fn download_to_file_derives_destination_in_work_dir() {
    let tmp = TempDir::new().unwrap();
    let store_dir = tmp.path().join("store");
    let store = LocalBlobStore::new(&store_dir, "seed").unwrap();
    store.create_container_if_not_exists("c").await.unwrap();
    store
        .upload_bytes("c", "report.txt", b"quarterly".to_vec())
        .await
        .unwrap();
    store
        .upload_bytes("c", "data.bin", b"binary".to_vec())
        .await
        .unwrap();

    let mut config = NodeConfig::new("dl", NodeKind::DownloadToFile);
    config.work_dir = Some(tmp.path().join("work"));
    let node = local_node(config, &store_dir);
    let host = RecordingHost::new();

    let msg = Message::default().with_container("c").with_blob("report.txt");
    node.on_input(msg.clone(), &host).await;
    assert_eq!(
        std::fs::read(tmp.path().join("work/report.downloaded.txt")).unwrap(),
        b"quarterly"
    );
    assert_eq!(host.sent(), vec![msg]);
    assert_eq!(host.statuses(), vec!["Receiving", "Received message"]);

    let msg = Message::default().with_container("c").with_blob("data.bin");
    node.on_input(msg, &host).await;
    assert_eq!(
        std::fs::read(tmp.path().join("work/data.bin")).unwrap(),
        b"binary"
    );
}

#[tokio::test]
async fn download_to_file_honours_payload_destination() {
    let tmp = TempDir::new().unwrap();
    let store_dir = tmp.path().join("store");
    let store = LocalBlobStore::new(&store_dir, "seed").unwrap();
    store.create_container_if_not_exists("c").await.unwrap();
    store
        .upload_bytes("c", "report.txt", b"quarterly".to_vec())
        .await
        .unwrap();

    let mut config = NodeConfig::new("dl", NodeKind::DownloadToFile);
    config.credentials.container = Some("c".to_string());
    config.credentials.blob = Some("report.txt".to_string());
    let node = local_node(config, &store_dir);
    let host = RecordingHost::new();

    let dest = tmp.path().join("out/copy.txt");
    node.on_input(Message::new(dest.display().to_string()), &host)
        .await;
    assert_eq!(std::fs::read(&dest).unwrap(), b"quarterly");
}

#[tokio::test]
async fn download_to_file_failure_is_silent() {
    let tmp = TempDir::new().unwrap();
    let mut config = NodeConfig::new("dl", NodeKind::DownloadToFile);
    config.work_dir = Some(tmp.path().join("work"));
    config.send_error = true;
    let node = local_node(config, &tmp.path().join("store"));
    let host = RecordingHost::new();

    let msg = Message::default().with_container("c").with_blob("missing.txt");
    node.on_input(msg, &host).await;

    assert_eq!(host.last_status(), Some("Error"));
    assert!(host.sent().is_empty());
    assert!(host.done_calls().is_empty());
}

#[tokio::test]
async fn download_to_buffer_concatenates_chunks_in_order() {
    let store = Arc::new(ScriptedStore {
        chunks: vec![&b"A"[..], &b"B"[..], &b"C"[..]],
        ..Default::default()
    });
    let node = scripted_node(
        NodeConfig::new("buf", NodeKind::DownloadToBuffer),
        Arc::clone(&store),
    );
    let host = RecordingHost::new();

    let msg = Message::default().with_container("c").with_blob("abc");
    node.on_input(msg.clone(), &host).await;

    let sent = host.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].id, msg.id);
    assert_eq!(sent[0].payload, Some(Payload::Bytes(b"ABC".to_vec())));
    assert_eq!(host.done_calls(), vec![None]);
    assert_eq!(host.last_status(), Some("Received message"));
}

#[tokio::test]
async fn download_to_buffer_with_local_chunks() {
    let tmp = TempDir::new().unwrap();
    let store = LocalBlobStore::new(tmp.path(), "chunked")
        .unwrap()
        .with_chunk_size(1);
    store.create_container_if_not_exists("c").await.unwrap();
    store
        .upload_bytes("c", "abc", b"ABC".to_vec())
        .await
        .unwrap();
    let store: Arc<dyn BlobStore> = Arc::new(store);
    let factory: Arc<dyn StoreFactory> = Arc::new(store);
    let node = BlobNode::new(
        NodeConfig::new("buf", NodeKind::DownloadToBuffer),
        None,
        factory,
    );
    let host = RecordingHost::new();

    node.on_input(Message::default().with_container("c").with_blob("abc"), &host)
        .await;
    assert_eq!(
        host.sent()[0].payload,
        Some(Payload::Bytes(b"ABC".to_vec()))
    );
}

#[tokio::test]
async fn download_to_buffer_forwards_error_when_enabled() {
    let store = Arc::new(ScriptedStore {
        chunks: vec![&b"A"[..], &b"B"[..]],
        fail_stream_after: Some(1),
        ..Default::default()
    });
    let mut config = NodeConfig::new("buf", NodeKind::DownloadToBuffer);
    config.send_error = true;
    let node = scripted_node(config, store);
    let host = RecordingHost::new();

    let msg = Message::new("ignored").with_container("c").with_blob("b");
    node.on_input(msg.clone(), &host).await;

    let sent = host.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].id, msg.id);
    assert_eq!(sent[0].payload, None);
    assert!(sent[0].error.as_deref().unwrap().contains("connection reset"));
    assert_eq!(host.done_calls().len(), 1);
    assert!(host.done_calls()[0].is_some());
    assert_eq!(host.last_status(), Some("Error"));
}

#[tokio::test]
async fn download_to_buffer_error_without_forwarding_still_completes() {
    let store = Arc::new(ScriptedStore {
        fail_stream_after: Some(0),
        ..Default::default()
    });
    let node = scripted_node(NodeConfig::new("buf", NodeKind::DownloadToBuffer), store);
    let host = RecordingHost::new();

    node.on_input(Message::default().with_container("c").with_blob("b"), &host)
        .await;

    assert!(host.sent().is_empty());
    assert_eq!(host.done_calls().len(), 1);
}

#[tokio::test]
async fn delete_emits_literal_text() {
    let store = Arc::new(ScriptedStore::default());
    let mut config = NodeConfig::new("del", NodeKind::Delete);
    config.credentials.container = Some("fromnode".to_string());
    let node = scripted_node(config, Arc::clone(&store));
    let host = RecordingHost::new();

    let msg = Message::default()
        .with_container("frommsg")
        .with_blob("old.txt");
    node.on_input(msg, &host).await;

    assert_eq!(store.calls(), vec!["delete fromnode/old.txt"]);
    let sent = host.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].payload, Some(Payload::Text("Blob deleted".to_string())));
    assert_eq!(host.statuses(), vec!["Sending", "Sent message"]);
}

#[tokio::test]
async fn delete_failure_sends_nothing() {
    let tmp = TempDir::new().unwrap();
    let node = local_node(NodeConfig::new("del", NodeKind::Delete), tmp.path());
    let host = RecordingHost::new();

    node.on_input(Message::default().with_container("c").with_blob("gone"), &host)
        .await;

    assert!(host.sent().is_empty());
    assert_eq!(host.last_status(), Some("Error"));
}

#[tokio::test]
async fn uniform_reporting_completes_and_forwards_for_every_variant() {
    let tmp = TempDir::new().unwrap();
    let mut config = NodeConfig::new("del", NodeKind::Delete);
    config.failure_reporting = FailureReporting::Uniform;
    config.send_error = true;
    let node = local_node(config, tmp.path());
    let host = RecordingHost::new();

    let msg = Message::default().with_container("c").with_blob("gone");
    node.on_input(msg.clone(), &host).await;

    let sent = host.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].id, msg.id);
    assert!(sent[0].error.is_some());
    assert_eq!(host.done_calls().len(), 1);
}

#[tokio::test]
async fn missing_credentials_fail_at_client_creation() {
    let node = NodeRegistry::with_blob_nodes()
        .create(
            NodeConfig::new("del", NodeKind::Delete),
            None,
            Arc::new(StoreTarget::Azure),
        )
        .unwrap();
    let host = RecordingHost::new();

    node.on_input(Message::default().with_container("c").with_blob("b"), &host)
        .await;

    assert_eq!(host.last_status(), Some("Error"));
    assert!(host.sent().is_empty());
    assert!(!node.is_connected());
}

#[tokio::test]
async fn close_reports_disconnected() {
    let store = Arc::new(ScriptedStore::default());
    let node = scripted_node(NodeConfig::new("del", NodeKind::Delete), store);
    let host = RecordingHost::new();

    node.on_input(Message::default().with_container("c").with_blob("b"), &host)
        .await;
    node.close(&host);

    assert_eq!(host.last_status(), Some("Disconnected"));
    assert!(!node.is_connected());
}

#[tokio::test]
async fn close_does_not_cancel_operation_in_flight() {
    let started = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let store = Arc::new(ScriptedStore {
        gate: Some((Arc::clone(&started), Arc::clone(&release))),
        ..Default::default()
    });
    let node = scripted_node(NodeConfig::new("del", NodeKind::Delete), Arc::clone(&store));
    let host = RecordingHost::new();

    let msg = Message::default().with_container("c").with_blob("b");
    tokio::join!(node.on_input(msg, &host), async {
        started.notified().await;
        assert_eq!(store.calls(), vec!["delete c/b"]);
        node.close(&host);
        assert!(!node.is_connected());
        release.notify_one();
    });

    assert_eq!(
        host.statuses(),
        vec!["Sending", "Disconnected", "Sent message"]
    );
    let sent = host.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].payload, Some(Payload::Text("Blob deleted".to_string())));
}

#[tokio::test]
async fn download_to_file_keeps_absolute_blob_names_in_work_dir() {
    let tmp = TempDir::new().unwrap();
    let store = Arc::new(ScriptedStore {
        chunks: vec![&b"quarterly"[..]],
        ..Default::default()
    });
    let mut config = NodeConfig::new("dl", NodeKind::DownloadToFile);
    config.work_dir = Some(tmp.path().join("work"));
    let node = scripted_node(config, store);
    let host = RecordingHost::new();

    let outside = tmp.path().join("outside/report.txt");
    let msg = Message::default()
        .with_container("c")
        .with_blob(outside.display().to_string());
    node.on_input(msg, &host).await;

    assert_eq!(host.last_status(), Some("Received message"));
    assert!(!tmp.path().join("outside").exists());
    let relative = outside
        .with_file_name("report.downloaded.txt")
        .strip_prefix("/")
        .unwrap()
        .to_path_buf();
    assert_eq!(
        std::fs::read(tmp.path().join("work").join(relative)).unwrap(),
        b"quarterly"
    );
}

#[tokio::test]
async fn local_store_refuses_blob_names_outside_it() {
    let tmp = TempDir::new().unwrap();
    let store_dir = tmp.path().join("store");
    LocalBlobStore::new(&store_dir, "seed")
        .unwrap()
        .create_container_if_not_exists("c")
        .await
        .unwrap();
    let victim = tmp.path().join("victim.txt");
    std::fs::write(&victim, b"keep").unwrap();

    let node = local_node(NodeConfig::new("del", NodeKind::Delete), &store_dir);
    let host = RecordingHost::new();
    let msg = Message::default()
        .with_container("c")
        .with_blob(victim.display().to_string());
    node.on_input(msg, &host).await;

    assert_eq!(host.last_status(), Some("Error"));
    assert!(host.sent().is_empty());
    assert!(victim.exists());
}
