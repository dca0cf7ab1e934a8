//! The client synchronization agent and its echo-avoidance contract.
//!
//! The agent owns the one shared "current document" value, which is
//! both the target of local keystrokes and the target of inbound
//! remote updates. Naively resending on every observed change would
//! loop forever (local → server → remote → local …). The guard is a
//! single pending-local-send flag:
//!
//! - a local edit sets the flag and *then* mutates the document, in
//!   that order, so no observer sees the new value with a stale flag;
//! - a remote update clears the flag before mutating, so the change is
//!   never re-sent (and any unsent local edit is discarded - remote
//!   wins, consistent with last-writer-wins);
//! - one watcher reacts to every document change: flag set means send
//!   exactly once and clear; flag clear means do nothing.
//!
//! N local edits with no intervening remote updates produce exactly N
//! outbound messages - no amplification, no coalescing.

use pairpad_proto::{ClientMessage, ServerMessage};
use tokio::sync::mpsc;
use tracing::debug;

/// Per-connection synchronization agent.
///
/// One agent exists per room session and is owned by it; nothing here
/// is process-global, so several rooms in one process do not collide.
pub struct SyncAgent {
    document: String,
    members: usize,
    pending_local_send: bool,
    transport_open: bool,
    outbound: mpsc::UnboundedSender<ClientMessage>,
}

impl SyncAgent {
    /// Create an agent plus the stream of messages it wants sent.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ClientMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                document: String::new(),
                members: 1,
                pending_local_send: false,
                transport_open: false,
                outbound: tx,
            },
            rx,
        )
    }

    /// The current shared document value.
    pub fn document(&self) -> &str {
        &self.document
    }

    /// Live member count of the room, as last reported by the server.
    pub fn member_count(&self) -> usize {
        self.members
    }

    /// Mark the transport open or closed. While closed, local edits are
    /// accepted but their sends are skipped (and the flag cleared, so a
    /// stale edit never leaks into a later flush).
    pub fn set_transport_open(&mut self, open: bool) {
        self.transport_open = open;
    }

    /// Record a local edit of the shared document.
    ///
    /// Flag before value, synchronously: the invariant the whole
    /// echo-avoidance scheme rests on.
    pub fn local_edit(&mut self, text: impl Into<String>) {
        self.pending_local_send = true;
        self.document = text.into();
        self.on_document_changed();
    }

    /// Apply an inbound server message.
    pub fn apply_remote(&mut self, msg: ServerMessage) {
        match msg {
            ServerMessage::Init { code } | ServerMessage::CodeUpdate { code } => {
                // Remote updates win; an unsent local edit is discarded.
                self.pending_local_send = false;
                self.document = code;
                self.on_document_changed();
            }
            ServerMessage::Members { count } => {
                self.members = count;
            }
            ServerMessage::Unknown => {
                debug!("Ignoring server message of unknown type");
            }
        }
    }

    /// The single watcher over the shared document value.
    fn on_document_changed(&mut self) {
        if !self.pending_local_send {
            // Caused by a remote update; sending would be an echo.
            return;
        }
        if self.transport_open {
            let _ = self.outbound.send(ClientMessage::CodeUpdate {
                code: self.document.clone(),
            });
        } else {
            debug!("Transport not open, skipping local update send");
        }
        self.pending_local_send = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_agent() -> (SyncAgent, mpsc::UnboundedReceiver<ClientMessage>) {
        let (mut agent, rx) = SyncAgent::new();
        agent.set_transport_open(true);
        (agent, rx)
    }

    #[tokio::test]
    async fn test_n_edits_produce_n_sends() {
        let (mut agent, mut rx) = open_agent();

        agent.local_edit("a");
        agent.local_edit("ab");
        agent.local_edit("abc");

        for expected in ["a", "ab", "abc"] {
            assert_eq!(
                rx.try_recv().expect("one send per edit"),
                ClientMessage::CodeUpdate {
                    code: expected.to_string()
                }
            );
        }
        assert!(rx.try_recv().is_err(), "no amplification");
    }

    #[tokio::test]
    async fn test_remote_update_is_not_echoed() {
        let (mut agent, mut rx) = open_agent();

        agent.apply_remote(ServerMessage::Init {
            code: "base".to_string(),
        });
        agent.apply_remote(ServerMessage::CodeUpdate {
            code: "base2".to_string(),
        });

        assert_eq!(agent.document(), "base2");
        assert!(rx.try_recv().is_err(), "remote updates must not be re-sent");
    }

    #[tokio::test]
    async fn test_remote_wins_over_unsent_local_edit() {
        let (mut agent, mut rx) = SyncAgent::new();

        // Transport down: the local edit's send is skipped and the flag
        // cleared.
        agent.local_edit("local-only");
        assert!(rx.try_recv().is_err());

        agent.set_transport_open(true);
        agent.apply_remote(ServerMessage::CodeUpdate {
            code: "remote".to_string(),
        });
        assert_eq!(agent.document(), "remote");
        assert!(rx.try_recv().is_err(), "stale local edit must not leak");

        // A fresh local edit still sends exactly once.
        agent.local_edit("fresh");
        assert_eq!(
            rx.try_recv().expect("send"),
            ClientMessage::CodeUpdate {
                code: "fresh".to_string()
            }
        );
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_member_count_tracking() {
        let (mut agent, _rx) = open_agent();
        assert_eq!(agent.member_count(), 1);

        agent.apply_remote(ServerMessage::Members { count: 3 });
        assert_eq!(agent.member_count(), 3);
        assert_eq!(agent.document(), "", "members message leaves the document alone");
    }

    #[tokio::test]
    async fn test_unknown_message_ignored() {
        let (mut agent, mut rx) = open_agent();
        agent.apply_remote(ServerMessage::Unknown);
        assert_eq!(agent.document(), "");
        assert!(rx.try_recv().is_err());
    }
}
