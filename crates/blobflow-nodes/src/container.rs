use blobflow_core::error::{BlobFlowError, Result};
use blobflow_storage::store::BlobStore;

/// Make sure `container` exists before anything is written to it.
pub async fn ensure(store: &dyn BlobStore, container: &str) -> Result<()> {
    match store.create_container_if_not_exists(container).await {
        Ok(created) => {
            if created {
                tracing::info!(container, "created container");
            }
            tracing::debug!(container, "container ready for blob creation");
            Ok(())
        }
        Err(e) => Err(BlobFlowError::ContainerCreation {
            container: container.to_string(),
            reason: e.to_string(),
        }),
    }
}
