//! A host that records everything a node does, for assertions in tests.

use std::sync::Mutex;

use crate::error::BlobFlowError;
use crate::host::NodeHost;
use crate::message::Message;
use crate::status::Indicator;

#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Status(Indicator),
    Send(Message),
    Done(Option<String>),
    Log(String),
    Error(String),
}

#[derive(Debug, Default)]
pub struct RecordingHost {
    events: Mutex<Vec<HostEvent>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, event: HostEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }

    pub fn events(&self) -> Vec<HostEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn statuses(&self) -> Vec<&'static str> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                HostEvent::Status(i) => Some(i.text),
                _ => None,
            })
            .collect()
    }

    pub fn last_status(&self) -> Option<&'static str> {
        self.statuses().last().copied()
    }

    pub fn sent(&self) -> Vec<Message> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                HostEvent::Send(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    pub fn done_calls(&self) -> Vec<Option<String>> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                HostEvent::Done(err) => Some(err),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                HostEvent::Error(text) => Some(text),
                _ => None,
            })
            .collect()
    }
}

impl NodeHost for RecordingHost {
    fn status(&self, indicator: Indicator) {
        self.push(HostEvent::Status(indicator));
    }

    fn send(&self, msg: Message) {
        self.push(HostEvent::Send(msg));
    }

    fn done(&self, error: Option<&BlobFlowError>) {
        self.push(HostEvent::Done(error.map(|e| e.to_string())));
    }

    fn log(&self, text: &str) {
        tracing::debug!("{text}");
        self.push(HostEvent::Log(text.to_string()));
    }

    fn error(&self, text: &str, _msg: Option<&Message>) {
        tracing::debug!("{text}");
        self.push(HostEvent::Error(text.to_string()));
    }
}
