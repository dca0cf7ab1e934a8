//! JSON schemas for the HTTP endpoints (`POST /rooms`,
//! `POST /autocomplete`). Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};

/// Response body of `POST /rooms`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomCreateResponse {
    /// Opaque URL-safe token identifying the new room.
    pub room_id: String,
}

/// Request body of `POST /autocomplete`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutocompleteRequest {
    /// Full current document text.
    pub code: String,
    /// Caret offset within `code`.
    pub cursor_position: usize,
    /// Language tag, e.g. "python".
    pub language: String,
}

/// Response body of `POST /autocomplete`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutocompleteResponse {
    /// A single suggestion, or `null` when the service has none.
    pub suggestion: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case_fields() {
        let resp = RoomCreateResponse {
            room_id: "abc123".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&resp).unwrap(),
            r#"{"roomId":"abc123"}"#
        );

        let req: AutocompleteRequest =
            serde_json::from_str(r#"{"code":"def","cursorPosition":3,"language":"python"}"#)
                .unwrap();
        assert_eq!(req.cursor_position, 3);
        assert_eq!(req.language, "python");
    }

    #[test]
    fn test_null_suggestion() {
        let resp: AutocompleteResponse = serde_json::from_str(r#"{"suggestion":null}"#).unwrap();
        assert_eq!(resp.suggestion, None);
    }
}
