//! Client error types.

use thiserror::Error;

/// Errors from the room transport or the suggestion backend.
///
/// Suggestion failures never propagate past the proxy (soft-fail);
/// they exist here so backends can report them uniformly.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("protocol error: {0}")]
    Protocol(#[from] pairpad_proto::ProtocolError),
}
