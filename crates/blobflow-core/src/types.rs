use serde::{Deserialize, Serialize};
use std::fmt;

/// The node variants this crate family registers with a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    #[serde(rename = "Upload Blob")]
    Upload,
    #[serde(rename = "Download to file")]
    DownloadToFile,
    #[serde(rename = "Download to buffer")]
    DownloadToBuffer,
    #[serde(rename = "Delete Blob")]
    Delete,
}

impl NodeKind {
    pub const ALL: [NodeKind; 4] = [
        NodeKind::Upload,
        NodeKind::DownloadToFile,
        NodeKind::DownloadToBuffer,
        NodeKind::Delete,
    ];

    /// Type name the node is registered under.
    pub fn type_name(self) -> &'static str {
        match self {
            NodeKind::Upload => "Upload Blob",
            NodeKind::DownloadToFile => "Download to file",
            NodeKind::DownloadToBuffer => "Download to buffer",
            NodeKind::Delete => "Delete Blob",
        }
    }

    /// Display name used when the node config leaves `name` blank.
    pub fn default_name(self) -> &'static str {
        match self {
            NodeKind::Upload => "Upload to Blob Storage",
            NodeKind::DownloadToFile => "Download to file",
            NodeKind::DownloadToBuffer => "Download to buffer",
            NodeKind::Delete => "Delete Blob",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

impl std::str::FromStr for NodeKind {
    type Err = crate::error::BlobFlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeKind::ALL
            .iter()
            .copied()
            .find(|k| k.type_name() == s)
            .ok_or_else(|| crate::error::BlobFlowError::UnknownNodeType(s.to_string()))
    }
}

/// How a failed operation is surfaced to the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureReporting {
    /// Status goes to `Error` and the flow stops. Only the buffer download
    /// forwards an error message and signals completion.
    #[default]
    Silent,
    /// Every variant signals completion with the error, and forwards an
    /// error message when `send_error` is set.
    Uniform,
}

impl fmt::Display for FailureReporting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReporting::Silent => write!(f, "silent"),
            FailureReporting::Uniform => write!(f, "uniform"),
        }
    }
}
