use meshscope_core::node_config::NodeConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx reply; the body is what the node had to say about it.
    #[error("{body} (HTTP {code})")]
    Status { code: u16, body: String },

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    InvalidConfig(#[from] NodeConfigError),

    #[error("a request for this action is already in flight")]
    Busy,

    #[error("cancelled")]
    Cancelled,

    #[error("websocket: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("invalid url: {0}")]
    Url(String),
}
