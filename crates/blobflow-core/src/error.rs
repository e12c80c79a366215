use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlobFlowError {
    // IO
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Config
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration file not found at {0}, run `blobflow init` first")]
    ConfigNotFound(String),

    #[error("Unknown node type: {0}")]
    UnknownNodeType(String),

    #[error("Node not found: {0}")]
    NodeNotFound(String),

    // Credentials
    #[error("Missing credential '{0}': set it on the node or in [blob_storage]")]
    MissingCredential(&'static str),

    #[error("Missing {0}: not set in node credentials or message")]
    MissingTarget(&'static str),

    // Storage
    #[error("Storage client error: {0}")]
    Client(String),

    #[error("Could not create container '{container}': {reason}")]
    ContainerCreation { container: String, reason: String },

    #[error("{op} of blob '{blob}' in container '{container}' failed: {reason}")]
    Transfer {
        op: &'static str,
        container: String,
        blob: String,
        reason: String,
    },

    #[error("Stream error while reading blob '{blob}': {reason}")]
    Stream { blob: String, reason: String },

    // Serialization
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(String),

    #[error("TOML serialization error: {0}")]
    TomlSer(String),
}

impl BlobFlowError {
    pub fn transfer(
        op: &'static str,
        container: &str,
        blob: &str,
        reason: impl std::fmt::Display,
    ) -> Self {
        BlobFlowError::Transfer {
            op,
            container: container.to_string(),
            blob: blob.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BlobFlowError>;
