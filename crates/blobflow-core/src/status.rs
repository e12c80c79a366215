use serde::Serialize;
use std::fmt;

/// Phase of the last operation on a node, shown by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationStatus {
    Disconnected,
    Sending,
    Sent,
    Error,
    Receiving,
    Received,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Fill {
    Red,
    Green,
    Blue,
    Grey,
    Yellow,
}

impl fmt::Display for Fill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fill::Red => write!(f, "red"),
            Fill::Green => write!(f, "green"),
            Fill::Blue => write!(f, "blue"),
            Fill::Grey => write!(f, "grey"),
            Fill::Yellow => write!(f, "yellow"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Dot,
}

/// What the host draws next to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Indicator {
    pub fill: Fill,
    pub shape: Shape,
    pub text: &'static str,
}

impl OperationStatus {
    pub fn indicator(self) -> Indicator {
        let (fill, text) = match self {
            OperationStatus::Disconnected => (Fill::Red, "Disconnected"),
            OperationStatus::Sending => (Fill::Green, "Sending"),
            OperationStatus::Sent => (Fill::Blue, "Sent message"),
            OperationStatus::Error => (Fill::Grey, "Error"),
            OperationStatus::Receiving => (Fill::Yellow, "Receiving"),
            OperationStatus::Received => (Fill::Green, "Received message"),
        };
        Indicator {
            fill,
            shape: Shape::Dot,
            text,
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.fill, self.text)
    }
}
