use std::path::PathBuf;
use std::sync::Arc;

use blobflow_core::config::credentials::AccountInfo;
use blobflow_core::error::{BlobFlowError, Result};

use crate::local::LocalBlobStore;
use crate::store::BlobStore;

/// Builds the storage client a node uses for its lifetime.
pub trait StoreFactory: Send + Sync {
    fn connect(&self, account: &AccountInfo) -> Result<Arc<dyn BlobStore>>;
}

/// Where node clients point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreTarget {
    /// The real service, authenticated with the resolved account key.
    Azure,
    /// Local Azurite emulator with its well-known account.
    Emulator,
    /// Directory tree on the local filesystem.
    Local(PathBuf),
}

impl StoreFactory for StoreTarget {
    fn connect(&self, account: &AccountInfo) -> Result<Arc<dyn BlobStore>> {
        match self {
            StoreTarget::Azure => connect_azure(account),
            StoreTarget::Emulator => connect_emulator(),
            StoreTarget::Local(base) => {
                let store = LocalBlobStore::new(base, "local")
                    .map_err(|e| BlobFlowError::Client(e.to_string()))?;
                Ok(Arc::new(store))
            }
        }
    }
}

/// Every node shares one already-built store.
impl StoreFactory for Arc<dyn BlobStore> {
    fn connect(&self, _account: &AccountInfo) -> Result<Arc<dyn BlobStore>> {
        Ok(Arc::clone(self))
    }
}

#[cfg(feature = "azure")]
fn connect_azure(account: &AccountInfo) -> Result<Arc<dyn BlobStore>> {
    let name = account
        .name
        .as_deref()
        .ok_or(BlobFlowError::MissingCredential("accountname"))?;
    let key = account
        .key
        .as_deref()
        .ok_or(BlobFlowError::MissingCredential("key"))?;
    tracing::debug!(account = name, "creating Azure blob client");
    let store = crate::azure::AzureBlobStore::new(name, key, name)
        .map_err(|e| BlobFlowError::Client(e.to_string()))?;
    Ok(Arc::new(store))
}

#[cfg(feature = "azure")]
fn connect_emulator() -> Result<Arc<dyn BlobStore>> {
    let store = crate::azure::AzureBlobStore::emulator("azurite")
        .map_err(|e| BlobFlowError::Client(e.to_string()))?;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "azure"))]
fn connect_azure(_account: &AccountInfo) -> Result<Arc<dyn BlobStore>> {
    Err(BlobFlowError::Client(
        "built without the `azure` feature".to_string(),
    ))
}

#[cfg(not(feature = "azure"))]
fn connect_emulator() -> Result<Arc<dyn BlobStore>> {
    connect_azure(&AccountInfo::default())
}
