//! Protocol error types.

use thiserror::Error;

/// Errors produced while decoding or encoding wire messages.
///
/// A `Decode` error corresponds to the MalformedMessage case: the frame
/// is unparseable or missing a required field. Receivers drop the frame
/// and keep the connection open.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The frame was not valid JSON for the message schema.
    #[error("malformed message: {0}")]
    Decode(#[source] serde_json::Error),

    /// A message could not be serialized to JSON.
    #[error("failed to encode message: {0}")]
    Encode(#[source] serde_json::Error),
}
