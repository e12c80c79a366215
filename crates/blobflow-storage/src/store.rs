use std::path::Path;

use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use futures::stream::BoxStream;
use tokio::io::AsyncWriteExt;

/// Blob contents as they arrive from the service, in order.
pub type ChunkStream = BoxStream<'static, anyhow::Result<Bytes>>;

/// Trait for blob storage backends.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Create the container unless it exists. Returns `true` when it was created.
    async fn create_container_if_not_exists(&self, container: &str) -> anyhow::Result<bool>;

    /// Write a block blob from memory.
    async fn upload_bytes(&self, container: &str, blob: &str, data: Vec<u8>)
    -> anyhow::Result<()>;

    /// Write a block blob from a local file.
    async fn upload_file(&self, container: &str, blob: &str, path: &Path) -> anyhow::Result<()> {
        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        self.upload_bytes(container, blob, data).await
    }

    /// Stream a blob's contents chunk by chunk.
    fn read_stream(&self, container: &str, blob: &str) -> ChunkStream;

    /// Download a blob into a local file. Returns the number of bytes written.
    async fn download_to_file(
        &self,
        container: &str,
        blob: &str,
        dest: &Path,
    ) -> anyhow::Result<u64> {
        let mut stream = self.read_stream(container, blob);
        let mut file = tokio::fs::File::create(dest)
            .await
            .with_context(|| format!("creating {}", dest.display()))?;
        let copied = async {
            let mut written = 0u64;
            while let Some(chunk) = stream.next().await {
                let chunk = chunk?;
                file.write_all(&chunk).await?;
                written += chunk.len() as u64;
            }
            file.flush().await?;
            Ok::<u64, anyhow::Error>(written)
        }
        .await;
        if copied.is_err() {
            // No partial files left behind.
            drop(file);
            let _ = tokio::fs::remove_file(dest).await;
        }
        copied
    }

    /// Delete a blob.
    async fn delete_blob(&self, container: &str, blob: &str) -> anyhow::Result<()>;

    /// Test connectivity.
    async fn test_connection(&self) -> anyhow::Result<()>;

    /// Store name for display.
    fn name(&self) -> &str;
}
