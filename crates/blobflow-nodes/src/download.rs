use std::path::{Component, Path, PathBuf};

use blobflow_core::error::{BlobFlowError, Result};
use blobflow_core::message::Payload;
use blobflow_storage::store::BlobStore;
use futures::StreamExt;

/// Where a download-to-file lands.
///
/// A non-empty text payload overrides the destination. Otherwise the first
/// `.txt` in the blob name becomes `.downloaded.txt` and the result is placed
/// under `work_dir`; names without `.txt` are used unchanged. Root, prefix and
/// `..` segments of the blob name are dropped so the file stays in `work_dir`.
pub fn destination(payload: Option<&Payload>, blob: &str, work_dir: &Path) -> PathBuf {
    if let Some(path) = payload.and_then(Payload::as_path) {
        return path.to_path_buf();
    }
    let name = blob.replacen(".txt", ".downloaded.txt", 1);
    let relative: PathBuf = Path::new(&name)
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect();
    work_dir.join(relative)
}

pub async fn to_file(store: &dyn BlobStore, container: &str, blob: &str, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let written = store
        .download_to_file(container, blob, dest)
        .await
        .map_err(|e| BlobFlowError::transfer("Download", container, blob, e))?;
    tracing::info!(
        container,
        blob,
        bytes = written,
        dest = %dest.display(),
        "blob downloaded to file"
    );
    Ok(())
}

/// Read the whole blob into memory, chunks appended in arrival order.
pub async fn to_buffer(store: &dyn BlobStore, container: &str, blob: &str) -> Result<Vec<u8>> {
    let mut stream = store.read_stream(container, blob);
    let mut buffer = Vec::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| BlobFlowError::Stream {
            blob: blob.to_string(),
            reason: e.to_string(),
        })?;
        buffer.extend_from_slice(&chunk);
    }
    tracing::info!(container, blob, bytes = buffer.len(), "blob read into buffer");
    Ok(buffer)
}
