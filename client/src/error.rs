use thiserror::Error;
use tokio_tungstenite::tungstenite;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Room-info request could not complete or returned a non-success status
    #[error("Room info request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Room-info body was not the expected JSON
    #[error("Malformed room info: {0}")]
    Protocol(String),

    #[error("WebSocket error: {0}")]
    Transport(#[from] tungstenite::Error),

    /// The transport writer has already shut down
    #[error("Connection closed")]
    Closed,

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;
