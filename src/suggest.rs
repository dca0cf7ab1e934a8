//! Autocomplete rule engine backing `POST /autocomplete`.
//!
//! A handful of suffix rules standing in for a real AI collaborator.
//! The contract matters more than the rules: one request in, one
//! suggestion (or none) out, no errors surfaced to callers.

use pairpad_proto::rest::{AutocompleteRequest, AutocompleteResponse};

/// Produce a suggestion for the given document state.
pub fn complete(request: &AutocompleteRequest) -> AutocompleteResponse {
    let code = request.code.trim();
    let mut suggestion = String::new();

    if request.language == "python" {
        if code.ends_with("def") {
            suggestion = " my_function():\n    pass".to_string();
        } else if code.ends_with("for") {
            suggestion = " i in range(10):\n    print(i)".to_string();
        } else {
            suggestion = "\n# TODO: implement".to_string();
        }
    }

    if suggestion.is_empty() {
        suggestion = "// no suggestion".to_string();
    }

    AutocompleteResponse {
        suggestion: Some(suggestion),
    }
}
