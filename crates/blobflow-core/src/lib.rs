//! Shared building blocks for the blobflow nodes: message and credential
//! types, the fallback configuration, the status table and the host seam.

pub mod config;
pub mod error;
pub mod host;
pub mod message;
pub mod status;
pub mod testing;
pub mod types;

pub use error::{BlobFlowError, Result};
