use thiserror::Error;

/// Main error type for pushsocket
#[derive(Error, Debug)]
pub enum PushSocketError {
    /// WebSocket transport error
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// Connection closed by the peer or the network
    #[error("Connection closed: {0}")]
    ConnectionClosed(String),

    /// Inbound payload could not be turned into a typed message
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Result type for pushsocket operations
pub type Result<T> = std::result::Result<T, PushSocketError>;
