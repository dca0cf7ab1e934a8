//! pairpad - room-based real-time collaborative editing service.
//!
//! Clients join a room over WebSocket, edit one shared document, and
//! see each other's edits and the live member count. Each room is an
//! isolated actor task; the registry maps room ids to actor handles.

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod metrics;
pub mod network;
pub mod state;
pub mod suggest;
