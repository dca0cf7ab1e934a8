//! # pairpad-client
//!
//! Client-side counterpart to the pairpad server: applies inbound
//! updates, detects local edits, suppresses echo, and emits outbound
//! updates; plus a debounced proxy for the autocomplete collaborator.

pub mod error;
pub mod room;
pub mod suggest;
pub mod sync;

pub use error::ClientError;
pub use room::RoomClient;
pub use suggest::{HttpSuggestionBackend, SuggestionBackend, SuggestionProxy};
pub use sync::SyncAgent;
