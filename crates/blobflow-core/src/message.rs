use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// Message body: a text value (usually a file path) or raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Text(String),
    Bytes(Vec<u8>),
}

impl Payload {
    /// Non-empty text payload read as a local path.
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Payload::Text(s) if !s.is_empty() => Some(Path::new(s)),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Payload::Text(s) => s.as_bytes(),
            Payload::Bytes(b) => b,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Payload::Text(s.to_string())
    }
}

impl From<String> for Payload {
    fn from(s: String) -> Self {
        Payload::Text(s)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(b: Vec<u8>) -> Self {
        Payload::Bytes(b)
    }
}

fn new_msg_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

/// Unit of data passed between flow nodes.
///
/// Fields the nodes do not know about are kept in `extra` and travel with
/// the message untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "_msgid", default = "new_msg_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Payload>,
    #[serde(
        rename = "containerName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub container_name: Option<String>,
    #[serde(rename = "blobName", default, skip_serializing_if = "Option::is_none")]
    pub blob_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Message {
    fn default() -> Self {
        Self {
            id: new_msg_id(),
            payload: None,
            container_name: None,
            blob_name: None,
            error: None,
            extra: Map::new(),
        }
    }
}

impl Message {
    pub fn new(payload: impl Into<Payload>) -> Self {
        Self {
            payload: Some(payload.into()),
            ..Default::default()
        }
    }

    /// Fresh message carrying only a text payload.
    pub fn text(text: &str) -> Self {
        Self::new(text)
    }

    #[must_use]
    pub fn with_container(mut self, container: impl Into<String>) -> Self {
        self.container_name = Some(container.into());
        self
    }

    #[must_use]
    pub fn with_blob(mut self, blob: impl Into<String>) -> Self {
        self.blob_name = Some(blob.into());
        self
    }

    /// Copy of this message with the payload dropped and `error` set.
    pub fn error_reply(&self, error: impl std::fmt::Display) -> Self {
        let mut reply = self.clone();
        reply.payload = None;
        reply.error = Some(error.to_string());
        reply
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_inbound_shape() {
        let json = r#"{"payload":"/tmp/a.txt","containerName":"c","blobName":"a.txt","topic":"t"}"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.payload, Some(Payload::Text("/tmp/a.txt".to_string())));
        assert_eq!(msg.container_name.as_deref(), Some("c"));
        assert_eq!(msg.blob_name.as_deref(), Some("a.txt"));
        assert_eq!(msg.extra.get("topic"), Some(&Value::from("t")));
        assert!(!msg.id.is_empty());
    }

    #[test]
    fn extra_fields_survive_serialization() {
        let json = r#"{"_msgid":"m1","payload":[1,2,3],"topic":"t"}"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.payload, Some(Payload::Bytes(vec![1, 2, 3])));
        let out = serde_json::to_value(&msg).unwrap();
        assert_eq!(out["_msgid"], "m1");
        assert_eq!(out["topic"], "t");
    }

    #[test]
    fn error_reply_drops_payload_keeps_id() {
        let msg = Message::new(vec![1u8, 2]).with_blob("b");
        let reply = msg.error_reply("boom");
        assert_eq!(reply.id, msg.id);
        assert_eq!(reply.payload, None);
        assert_eq!(reply.error.as_deref(), Some("boom"));
        assert_eq!(reply.blob_name.as_deref(), Some("b"));
    }

    #[test]
    fn empty_text_is_not_a_path() {
        assert!(Payload::Text(String::new()).as_path().is_none());
        assert!(Payload::Bytes(b"/tmp/x".to_vec()).as_path().is_none());
        assert_eq!(
            Payload::from("/tmp/x").as_path(),
            Some(Path::new("/tmp/x"))
        );
    }
}
