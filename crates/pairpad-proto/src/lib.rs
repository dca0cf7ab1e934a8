//! # pairpad-proto
//!
//! Message schema and framing rules shared by the pairpad server and
//! client. The wire format is JSON text frames tagged by a `"type"`
//! field; unknown types are tolerated on both sides so the protocol can
//! evolve without breaking older peers.
//!
//! ## Quick Start
//!
//! ```rust
//! use pairpad_proto::{ClientMessage, ServerMessage};
//!
//! let msg = ClientMessage::decode(r#"{"type":"code_update","code":"print(1)"}"#).unwrap();
//! assert_eq!(msg, ClientMessage::CodeUpdate { code: "print(1)".into() });
//!
//! let frame = ServerMessage::Members { count: 2 }.encode().unwrap();
//! assert_eq!(frame, r#"{"type":"members","count":2}"#);
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod error;
pub mod message;
pub mod rest;

pub use error::ProtocolError;
pub use message::{ClientMessage, ServerMessage};
