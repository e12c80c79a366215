#[cfg(feature = "azure")]
mod inner {
    use async_trait::async_trait;
    use azure_core::StatusCode;
    use azure_storage::StorageCredentials;
    use azure_storage_blobs::prelude::*;
    use bytes::Bytes;
    use futures::StreamExt;

    use crate::store::{BlobStore, ChunkStream};

    /// Azure Blob Storage store.
    pub struct AzureBlobStore {
        service_client: BlobServiceClient,
        name: String,
    }

    impl AzureBlobStore {
        /// Create from storage account name + access key.
        pub fn new(account: &str, access_key: &str, name: &str) -> anyhow::Result<Self> {
            let credentials = StorageCredentials::access_key(account, access_key.to_string());
            let service_client = ClientBuilder::new(account, credentials).blob_service_client();

            Ok(Self {
                service_client,
                name: name.to_string(),
            })
        }

        /// Create using the emulator (Azurite).
        pub fn emulator(name: &str) -> anyhow::Result<Self> {
            let service_client = ClientBuilder::emulator().blob_service_client();

            Ok(Self {
                service_client,
                name: name.to_string(),
            })
        }
    }

    #[async_trait]
    impl BlobStore for AzureBlobStore {
        async fn create_container_if_not_exists(&self, container: &str) -> anyhow::Result<bool> {
            let client = self.service_client.container_client(container);
            if client.exists().await? {
                return Ok(false);
            }
            // Another caller may create it between the check and here.
            match client.create().await {
                Ok(_) => Ok(true),
                Err(e)
                    if e
                        .as_http_error()
                        .is_some_and(|h| h.status() == StatusCode::Conflict) =>
                {
                    Ok(false)
                }
                Err(e) => Err(e.into()),
            }
        }

        async fn upload_bytes(
            &self,
            container: &str,
            blob: &str,
            data: Vec<u8>,
        ) -> anyhow::Result<()> {
            self.service_client
                .container_client(container)
                .blob_client(blob)
                .put_block_blob(data)
                .await?;
            Ok(())
        }

        fn read_stream(&self, container: &str, blob: &str) -> ChunkStream {
            let blob_client = self
                .service_client
                .container_client(container)
                .blob_client(blob);
            blob_client
                .get()
                .into_stream()
                .then(|response| async move {
                    let data: Bytes = response?.data.collect().await?;
                    Ok::<Bytes, anyhow::Error>(data)
                })
                .boxed()
        }

        async fn delete_blob(&self, container: &str, blob: &str) -> anyhow::Result<()> {
            self.service_client
                .container_client(container)
                .blob_client(blob)
                .delete()
                .await?;
            Ok(())
        }

        async fn test_connection(&self) -> anyhow::Result<()> {
            match self.service_client.list_containers().into_stream().next().await {
                Some(Err(e)) => Err(e.into()),
                _ => Ok(()),
            }
        }

        fn name(&self) -> &str {
            &self.name
        }
    }
}

#[cfg(feature = "azure")]
pub use inner::AzureBlobStore;
