use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeConfigError {
    Empty,
    InvalidJson(String),
}

impl fmt::Display for NodeConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeConfigError::Empty => f.write_str("Node config is empty."),
            NodeConfigError::InvalidJson(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for NodeConfigError {}

pub const VALID_MESSAGE: &str = "Node config is valid JSON.";
pub const SENT_MESSAGE: &str = "Successfully sent configuration to node.";

/// Checks the draft is JSON. The text itself is sent unchanged.
pub fn validate_node_config(draft: &str) -> Result<(), NodeConfigError> {
    if draft.trim().is_empty() {
        return Err(NodeConfigError::Empty);
    }

    serde_json::from_str::<serde_json::Value>(draft)
        .map(|_| ())
        .map_err(|e| NodeConfigError::InvalidJson(e.to_string()))
}
