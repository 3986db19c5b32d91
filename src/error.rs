//! Error types for zbx-client.

use thiserror::Error;

/// Main error type for all Zabbix client operations.
#[derive(Debug, Error)]
pub enum ZabbixError {
    /// I/O error during socket operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed frame (short header, bad magic, oversized payload).
    #[error("Frame format error: {0}")]
    Format(String),

    /// Peer closed the connection without sending a response.
    #[error("Empty response: peer closed without sending data")]
    EmptyResponse,

    /// Connection closed in the middle of a frame.
    #[error("Connection closed mid-frame")]
    ConnectionClosed,

    /// Expected key absent from a decoded response payload.
    #[error("Missing `{0}` field in response payload")]
    MissingField(&'static str),

    /// HTTP transport error (JSON-RPC client).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server-reported JSON-RPC error.
    #[error("API error: {0}")]
    Api(String),
}

/// Result type alias using ZabbixError.
pub type Result<T> = std::result::Result<T, ZabbixError>;
