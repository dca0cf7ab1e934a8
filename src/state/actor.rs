//! Actor model for room state management.
//!
//! Each room runs as an isolated Tokio task owning the authoritative
//! document, version counter, and member set. All interactions happen
//! via `RoomEvent` messages sent to the actor, so operations on one
//! room are serialized while distinct rooms never contend.

use crate::error::RoomError;
use crate::state::ConnId;
use crate::state::registry::{RoomId, RoomRegistry};
use chrono::Utc;
use pairpad_proto::ServerMessage;
use std::collections::HashMap;
use std::sync::Weak;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

/// Capacity of a room actor's event inbox.
const ROOM_INBOX_CAPACITY: usize = 100;

/// Snapshot returned to a joining connection.
#[derive(Debug, Clone)]
pub struct JoinSnapshot {
    /// The document at the instant of the join.
    pub document: String,
    /// The room version at the instant of the join. Not echoed to the
    /// client by the current protocol; kept for future evolution.
    pub version: u64,
}

/// Room state snapshot for observability and tests.
#[derive(Debug, Clone)]
pub struct RoomInfo {
    pub id: RoomId,
    pub document: String,
    pub version: u64,
    pub member_count: usize,
    /// Unix timestamp of room creation.
    pub created: i64,
}

/// Events that can be sent to a room actor.
#[derive(Debug)]
pub enum RoomEvent {
    /// A connection joining the room.
    Join {
        conn_id: ConnId,
        /// The connection's bounded outbound queue.
        sender: mpsc::Sender<ServerMessage>,
        reply_tx: oneshot::Sender<Result<JoinSnapshot, RoomError>>,
    },
    /// A connection leaving the room. Idempotent.
    Leave { conn_id: ConnId },
    /// A full-document update from a member. Last writer wins.
    Update { conn_id: ConnId, code: String },
    /// Request a state snapshot.
    GetInfo { reply_tx: oneshot::Sender<RoomInfo> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActorState {
    Active,
    Draining,
}

/// The Room Actor.
///
/// Owns the state of a single room and processes events sequentially.
pub struct RoomActor {
    id: RoomId,
    document: String,
    version: u64,
    members: HashMap<ConnId, mpsc::Sender<ServerMessage>>,
    registry: Weak<RoomRegistry>,
    state: ActorState,
    created: i64,
}

impl RoomActor {
    /// Create a new room actor and spawn it.
    pub fn spawn(id: RoomId, registry: Weak<RoomRegistry>) -> mpsc::Sender<RoomEvent> {
        let (tx, rx) = mpsc::channel(ROOM_INBOX_CAPACITY);

        let actor = Self {
            id,
            document: String::new(),
            version: 0,
            members: HashMap::new(),
            registry,
            state: ActorState::Active,
            created: Utc::now().timestamp(),
        };

        tokio::spawn(async move {
            actor.run(rx).await;
        });

        tx
    }

    /// The main actor loop. Ends when every handle to the inbox has
    /// been dropped.
    async fn run(mut self, mut rx: mpsc::Receiver<RoomEvent>) {
        while let Some(event) = rx.recv().await {
            self.handle_event(event);
        }
    }

    fn handle_event(&mut self, event: RoomEvent) {
        match event {
            RoomEvent::Join {
                conn_id,
                sender,
                reply_tx,
            } => {
                self.handle_join(conn_id, sender, reply_tx);
            }
            RoomEvent::Leave { conn_id } => {
                self.handle_leave(conn_id);
            }
            RoomEvent::Update { conn_id, code } => {
                self.handle_update(conn_id, code);
            }
            RoomEvent::GetInfo { reply_tx } => {
                let _ = reply_tx.send(RoomInfo {
                    id: self.id.clone(),
                    document: self.document.clone(),
                    version: self.version,
                    member_count: self.members.len(),
                    created: self.created,
                });
            }
        }
    }

    fn handle_join(
        &mut self,
        conn_id: ConnId,
        sender: mpsc::Sender<ServerMessage>,
        reply_tx: oneshot::Sender<Result<JoinSnapshot, RoomError>>,
    ) {
        if self.state == ActorState::Draining {
            // The registry entry is already gone; the caller retries and
            // gets a fresh actor.
            let _ = reply_tx.send(Err(RoomError::RoomClosed));
            return;
        }

        self.members.insert(conn_id.clone(), sender);
        debug!(room = %self.id, conn = %conn_id, members = self.members.len(), "Member joined");

        let snapshot = JoinSnapshot {
            document: self.document.clone(),
            version: self.version,
        };
        let _ = reply_tx.send(Ok(snapshot));

        // Count reflects the set after the join, delivered to everyone
        // including the joiner.
        self.broadcast_members();
        crate::metrics::set_room_members(&self.id, self.members.len() as i64);
    }

    fn handle_leave(&mut self, conn_id: ConnId) {
        if self.members.remove(&conn_id).is_none() {
            // Already gone (double close, or evicted for backpressure).
            return;
        }
        debug!(room = %self.id, conn = %conn_id, members = self.members.len(), "Member left");

        self.broadcast_members();
        crate::metrics::set_room_members(&self.id, self.members.len() as i64);
        self.cleanup_if_empty();
    }

    fn handle_update(&mut self, conn_id: ConnId, code: String) {
        // Last writer wins: the document is replaced wholesale and the
        // sender's causal history is not checked.
        self.document = code;
        self.version += 1;
        crate::metrics::record_update();

        let msg = ServerMessage::CodeUpdate {
            code: self.document.clone(),
        };
        // Excluding the sender is the primary echo-prevention
        // mechanism. A single-member room broadcasts to nobody but
        // still advanced version and document above.
        let dropped = self.fan_out(&msg, Some(&conn_id));
        self.reap(dropped);
    }

    /// Send `msg` to every member except `exclude`, returning the ids
    /// of members whose outbound queue was full.
    ///
    /// Delivery is isolated per recipient: a full or closed queue on
    /// one member never prevents delivery to the others.
    fn fan_out(&self, msg: &ServerMessage, exclude: Option<&ConnId>) -> Vec<ConnId> {
        let mut dropped = Vec::new();
        let mut recipients = 0usize;

        for (conn_id, sender) in &self.members {
            if exclude == Some(conn_id) {
                continue;
            }
            recipients += 1;
            if let Err(err) = sender.try_send(msg.clone()) {
                match err {
                    TrySendError::Full(_) => {
                        warn!(room = %self.id, conn = %conn_id, "Outbound queue full, disconnecting member");
                        crate::metrics::record_dropped_message();
                        dropped.push(conn_id.clone());
                    }
                    // Closed means the connection is already tearing
                    // down; its Leave will arrive on its own.
                    TrySendError::Closed(_) => {}
                }
            }
        }

        crate::metrics::record_fanout(recipients);
        dropped
    }

    /// Evict members that could not keep up with the broadcast stream.
    ///
    /// Dropping a member's sender closes its outbound queue, which ends
    /// that connection's writer task and ultimately its socket. The
    /// remainder is told the new count; a member whose queue is full
    /// even for that notification is severed without another round.
    fn reap(&mut self, dropped: Vec<ConnId>) {
        if dropped.is_empty() {
            return;
        }
        for conn_id in &dropped {
            self.members.remove(conn_id);
        }

        let msg = ServerMessage::Members {
            count: self.members.len(),
        };
        let more = self.fan_out(&msg, None);
        for conn_id in &more {
            self.members.remove(conn_id);
        }

        crate::metrics::set_room_members(&self.id, self.members.len() as i64);
        self.cleanup_if_empty();
    }

    fn broadcast_members(&mut self) {
        let msg = ServerMessage::Members {
            count: self.members.len(),
        };
        let dropped = self.fan_out(&msg, None);
        self.reap(dropped);
    }

    fn cleanup_if_empty(&mut self) {
        if self.state == ActorState::Draining {
            return;
        }

        if self.members.is_empty() {
            self.state = ActorState::Draining;
            crate::metrics::remove_room_metrics(&self.id);

            if let Some(registry) = self.registry.upgrade() {
                registry.remove(&self.id);
            }
        }
    }
}
