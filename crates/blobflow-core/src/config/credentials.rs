//! Per-node credentials and the account resolution rule.
//!
//! A per-node field wins when it is a non-empty string. Otherwise the
//! same-named field of the process-wide `[blob_storage]` section is used, and
//! failing that the value is absent. Absence is never an error here; it
//! surfaces later when the storage client is built or called.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::BlobStorageSection;

/// Fields a node exposes in its credential set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialField {
    AccountName,
    Key,
    Container,
    Blob,
}

impl CredentialField {
    pub const ALL: [CredentialField; 4] = [
        CredentialField::AccountName,
        CredentialField::Key,
        CredentialField::Container,
        CredentialField::Blob,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CredentialField::AccountName => "accountname",
            CredentialField::Key => "key",
            CredentialField::Container => "container",
            CredentialField::Blob => "blob",
        }
    }
}

impl fmt::Display for CredentialField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Credential set stored with a node instance. Any field may be blank.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accountname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blob: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("accountname", &self.accountname)
            .field("key", &self.key.as_ref().map(|_| "[REDACTED]"))
            .field("container", &self.container)
            .field("blob", &self.blob)
            .finish()
    }
}

impl Credentials {
    /// Field value, treating an empty string as unset.
    pub fn get(&self, field: CredentialField) -> Option<&str> {
        let value = match field {
            CredentialField::AccountName => &self.accountname,
            CredentialField::Key => &self.key,
            CredentialField::Container => &self.container,
            CredentialField::Blob => &self.blob,
        };
        value.as_deref().filter(|v| !v.is_empty())
    }
}

/// Resolve one field: node credential, then fallback section, then `None`.
pub fn resolve(
    credentials: &Credentials,
    fallback: Option<&BlobStorageSection>,
    field: CredentialField,
) -> Option<String> {
    if let Some(value) = credentials.get(field) {
        return Some(value.to_string());
    }
    fallback.and_then(|section| section.get(field)).map(str::to_string)
}

/// Effective storage account for one node instance.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AccountInfo {
    pub name: Option<String>,
    pub key: Option<String>,
}

impl fmt::Debug for AccountInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountInfo")
            .field("name", &self.name)
            .field("key", &self.key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl AccountInfo {
    pub fn resolve(credentials: &Credentials, fallback: Option<&BlobStorageSection>) -> Self {
        Self {
            name: resolve(credentials, fallback, CredentialField::AccountName),
            key: resolve(credentials, fallback, CredentialField::Key),
        }
    }
}

/// Container or blob name: the node credential wins over the message field.
pub fn pick_target(credential: Option<&str>, message: Option<&str>) -> Option<String> {
    credential
        .filter(|v| !v.is_empty())
        .or(message.filter(|v| !v.is_empty()))
        .map(str::to_string)
}
