use blobflow_core::error::BlobFlowError;
use blobflow_core::host::NodeHost;
use blobflow_core::message::Message;
use blobflow_core::status::Indicator;

/// Host for a single node run from the shell: statuses and log lines go to
/// stderr, outbound messages to stdout as JSON lines.
pub struct ConsoleHost {
    node: String,
}

impl ConsoleHost {
    pub fn new(node: &str) -> Self {
        Self {
            node: node.to_string(),
        }
    }
}

impl NodeHost for ConsoleHost {
    fn status(&self, indicator: Indicator) {
        eprintln!("[{}] status {indicator}", self.node);
    }

    fn send(&self, msg: Message) {
        match serde_json::to_string(&msg) {
            Ok(json) => println!("{json}"),
            Err(e) => tracing::error!(node = %self.node, error = %e, "cannot encode message"),
        }
    }

    fn done(&self, error: Option<&BlobFlowError>) {
        match error {
            Some(e) => tracing::debug!(node = %self.node, error = %e, "done with error"),
            None => tracing::debug!(node = %self.node, "done"),
        }
    }

    fn log(&self, text: &str) {
        tracing::info!(node = %self.node, "{text}");
    }

    fn error(&self, text: &str, msg: Option<&Message>) {
        match msg {
            Some(msg) => tracing::error!(node = %self.node, msgid = %msg.id, "{text}"),
            None => tracing::error!(node = %self.node, "{text}"),
        }
    }
}
