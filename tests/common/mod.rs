//! Shared integration-test harness: an in-process server plus a thin
//! WebSocket test client.

pub mod client;
pub mod server;

#[allow(unused_imports)]
pub use client::TestWsClient;
#[allow(unused_imports)]
pub use server::TestServer;
