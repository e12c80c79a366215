use blobflow_core::error::{BlobFlowError, Result};
use blobflow_storage::store::BlobStore;

/// Text sent downstream after a successful delete.
pub const DELETED: &str = "Blob deleted";

pub async fn delete(store: &dyn BlobStore, container: &str, blob: &str) -> Result<()> {
    store
        .delete_blob(container, blob)
        .await
        .map_err(|e| BlobFlowError::transfer("Delete", container, blob, e))?;
    tracing::info!(container, blob, "blob deleted");
    Ok(())
}
