use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::path::{Component, Path, PathBuf};

use crate::store::{BlobStore, ChunkStream};

const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Filesystem-backed store: one directory per container under `base_path`.
pub struct LocalBlobStore {
    base_path: PathBuf,
    chunk_size: usize,
    name: String,
}

impl LocalBlobStore {
    pub fn new(base_path: &Path, name: &str) -> anyhow::Result<Self> {
        std::fs::create_dir_all(base_path)?;
        Ok(Self {
            base_path: base_path.to_path_buf(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            name: name.to_string(),
        })
    }

    /// Size of the chunks `read_stream` yields.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    fn container_path(&self, container: &str) -> anyhow::Result<PathBuf> {
        Ok(self.base_path.join(contained("container", container)?))
    }

    fn blob_path(&self, container: &str, blob: &str) -> anyhow::Result<PathBuf> {
        Ok(self.container_path(container)?.join(contained("blob", blob)?))
    }

    fn require_container(&self, container: &str) -> anyhow::Result<PathBuf> {
        let path = self.container_path(container)?;
        if !path.is_dir() {
            anyhow::bail!("ContainerNotFound: {container}");
        }
        Ok(path)
    }
}

/// Names map to paths under the store; anything but plain segments is refused.
fn contained<'a>(what: &str, name: &'a str) -> anyhow::Result<&'a Path> {
    let path = Path::new(name);
    if name.is_empty() || !path.components().all(|c| matches!(c, Component::Normal(_))) {
        anyhow::bail!("InvalidName: {what} '{name}'");
    }
    Ok(path)
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn create_container_if_not_exists(&self, container: &str) -> anyhow::Result<bool> {
        let path = self.container_path(container)?;
        if path.is_dir() {
            return Ok(false);
        }
        tokio::fs::create_dir_all(&path).await?;
        Ok(true)
    }

    async fn upload_bytes(
        &self,
        container: &str,
        blob: &str,
        data: Vec<u8>,
    ) -> anyhow::Result<()> {
        self.require_container(container)?;
        let path = self.blob_path(container, blob)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, data).await?;
        Ok(())
    }

    fn read_stream(&self, container: &str, blob: &str) -> ChunkStream {
        let path = self.blob_path(container, blob);
        let chunk_size = self.chunk_size;
        let blob = blob.to_string();
        stream::once(async move {
            tokio::fs::read(path?)
                .await
                .with_context(|| format!("BlobNotFound: {blob}"))
        })
        .map_ok(move |data| {
            let data = Bytes::from(data);
            let chunks: Vec<anyhow::Result<Bytes>> = (0..data.len())
                .step_by(chunk_size)
                .map(|start| Ok(data.slice(start..(start + chunk_size).min(data.len()))))
                .collect();
            stream::iter(chunks)
        })
        .try_flatten()
        .boxed()
    }

    async fn delete_blob(&self, container: &str, blob: &str) -> anyhow::Result<()> {
        self.require_container(container)?;
        let path = self.blob_path(container, blob)?;
        if !path.is_file() {
            anyhow::bail!("BlobNotFound: {blob}");
        }
        tokio::fs::remove_file(&path).await?;
        Ok(())
    }

    async fn test_connection(&self) -> anyhow::Result<()> {
        if !self.base_path.exists() {
            anyhow::bail!("Base path does not exist: {}", self.base_path.display());
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
