//! The seam between a node and the flow runtime that drives it.
//!
//! A host hands each node instance its own `NodeHost`. The node reports
//! status through it, sends outbound messages, signals completion and
//! writes to the host log.

use crate::error::BlobFlowError;
use crate::message::Message;
use crate::status::Indicator;

pub trait NodeHost: Send + Sync {
    /// Replace the node's visible indicator.
    fn status(&self, indicator: Indicator);

    /// Pass a message to downstream nodes.
    fn send(&self, msg: Message);

    /// Tell the scheduler the current input has been handled.
    fn done(&self, error: Option<&BlobFlowError>);

    fn log(&self, text: &str) {
        tracing::info!("{text}");
    }

    fn error(&self, text: &str, msg: Option<&Message>) {
        match msg {
            Some(msg) => tracing::error!(msgid = %msg.id, "{text}"),
            None => tracing::error!("{text}"),
        }
    }
}
