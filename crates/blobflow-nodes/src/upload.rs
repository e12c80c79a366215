use std::path::Path;

use blobflow_core::error::{BlobFlowError, Result};
use blobflow_core::message::Payload;
use blobflow_storage::store::BlobStore;

use crate::container;

/// Blob name for an upload: the node's `blob` credential, else the final path
/// component of the message `blobName`, else that of the source file.
pub fn blob_name(
    credential: Option<&str>,
    message_blob: Option<&str>,
    source: Option<&Payload>,
) -> Option<String> {
    if let Some(name) = credential.filter(|n| !n.is_empty()) {
        return Some(name.to_string());
    }
    message_blob
        .filter(|n| !n.is_empty())
        .map(Path::new)
        .or_else(|| source.and_then(Payload::as_path))
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy().into_owned())
}

/// Ensure the container, then write the blob from the payload.
///
/// A text payload is a local file path; a byte payload is uploaded as is.
pub async fn upload(
    store: &dyn BlobStore,
    container: &str,
    blob: &str,
    source: &Payload,
) -> Result<()> {
    container::ensure(store, container).await?;

    let result = match source {
        Payload::Text(path) => store.upload_file(container, blob, Path::new(path)).await,
        Payload::Bytes(data) => store.upload_bytes(container, blob, data.clone()).await,
    };
    result.map_err(|e| BlobFlowError::transfer("Upload", container, blob, e))?;

    tracing::info!(container, blob, "blob uploaded");
    Ok(())
}
