//! WebSocket message types and their JSON codec.
//!
//! Messages are internally tagged by a `"type"` field. Each direction
//! has its own enum; a frame carrying a recognized type but missing a
//! required field is a decode error, while an unrecognized type decodes
//! to the `Unknown` variant (forward compatibility: both sides ignore
//! it rather than dropping the connection).

use crate::error::ProtocolError;
use serde::{Deserialize, Serialize};

/// Messages sent from a client to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Full-document replacement produced by a local edit.
    CodeUpdate {
        /// The entire new document text.
        code: String,
    },

    /// Any unrecognized `type` value. Ignored by the server.
    #[serde(other)]
    Unknown,
}

/// Messages sent from the server to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Sent once on join, carrying the room's current document.
    Init {
        /// The document at the time of joining.
        code: String,
    },

    /// An update accepted from another member of the room.
    CodeUpdate {
        /// The entire new document text.
        code: String,
    },

    /// Sent on every join or leave with the live member count.
    Members {
        /// Number of connections attached to the room.
        count: usize,
    },

    /// Any unrecognized `type` value. Ignored by the client.
    #[serde(other)]
    Unknown,
}

impl ClientMessage {
    /// Decode a text frame.
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(text).map_err(ProtocolError::Decode)
    }

    /// Encode as a text frame.
    pub fn encode(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(ProtocolError::Encode)
    }
}

impl ServerMessage {
    /// Decode a text frame.
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(text).map_err(ProtocolError::Decode)
    }

    /// Encode as a text frame.
    pub fn encode(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(ProtocolError::Encode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_code_update() {
        let msg = ClientMessage::decode(r#"{"type":"code_update","code":"fn main() {}"}"#)
            .expect("valid frame");
        assert_eq!(
            msg,
            ClientMessage::CodeUpdate {
                code: "fn main() {}".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_type_is_tolerated() {
        let msg = ClientMessage::decode(r#"{"type":"cursor_move","x":3}"#).expect("valid frame");
        assert_eq!(msg, ClientMessage::Unknown);

        let msg = ServerMessage::decode(r#"{"type":"typing_indicator"}"#).expect("valid frame");
        assert_eq!(msg, ServerMessage::Unknown);
    }

    #[test]
    fn test_missing_required_field_is_malformed() {
        assert!(ClientMessage::decode(r#"{"type":"code_update"}"#).is_err());
        assert!(ClientMessage::decode(r#"{"type":"code_update","code":42}"#).is_err());
        assert!(ClientMessage::decode("not json at all").is_err());
    }

    #[test]
    fn test_server_message_encoding() {
        let init = ServerMessage::Init {
            code: String::new(),
        };
        assert_eq!(init.encode().unwrap(), r#"{"type":"init","code":""}"#);

        let update = ServerMessage::CodeUpdate {
            code: "print(1)".to_string(),
        };
        assert_eq!(
            update.encode().unwrap(),
            r#"{"type":"code_update","code":"print(1)"}"#
        );

        let members = ServerMessage::Members { count: 3 };
        assert_eq!(members.encode().unwrap(), r#"{"type":"members","count":3}"#);
    }

    #[test]
    fn test_round_trip_preserves_unicode() {
        let original = ClientMessage::CodeUpdate {
            code: "let π = 3.14; // ← approx".to_string(),
        };
        let decoded = ClientMessage::decode(&original.encode().unwrap()).unwrap();
        assert_eq!(decoded, original);
    }
}
