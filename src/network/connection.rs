//! Connection handler - binds one WebSocket client to one room.
//!
//! Each connection runs two tasks:
//!
//! ```text
//!   reader loop (this task)          writer task
//!   socket ──▶ ClientMessage ──▶ room actor
//!   room actor ──▶ bounded outbound queue ──▶ socket
//! ```
//!
//! The room holds the only sender half of the outbound queue. When the
//! room drops it (leave, or eviction for backpressure) the writer task
//! drains and ends, which ends the reader loop too. Cleanup runs on the
//! single exit path below, so `Leave` fires exactly once per socket.

use crate::error::RoomError;
use crate::state::{ConnId, JoinSnapshot, RoomEvent, RoomRegistry};
use axum::extract::ws::{Message as WsMessage, WebSocket};
use futures_util::{SinkExt, StreamExt};
use pairpad_proto::{ClientMessage, ServerMessage};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument, warn};

/// Outbound queue depth per connection. A member that stays this far
/// behind a room's broadcast stream is disconnected rather than allowed
/// to stall the room.
pub const OUTBOUND_QUEUE_SIZE: usize = 64;

/// How many times a join is retried when it races a room teardown.
const JOIN_RETRY_LIMIT: usize = 5;

/// Drive one client socket for its whole lifetime.
#[instrument(skip(socket, registry), fields(room = %room_id, conn = %conn_id))]
pub async fn handle_socket(
    socket: WebSocket,
    room_id: String,
    conn_id: ConnId,
    registry: Arc<RoomRegistry>,
) {
    let (outbound_tx, mut outbound_rx) = mpsc::channel::<ServerMessage>(OUTBOUND_QUEUE_SIZE);

    let (room_tx, snapshot) = match join_room(&registry, &room_id, &conn_id, outbound_tx).await {
        Ok(joined) => joined,
        Err(e) => {
            warn!(error = %e, code = e.error_code(), "Join failed");
            return;
        }
    };

    info!("Client joined room");
    crate::metrics::inc_connected_clients();

    let (mut sink, mut stream) = socket.split();

    // The init message goes straight to the sink so it precedes anything
    // the room has already queued for us.
    let JoinSnapshot { document, .. } = snapshot;
    let init = ServerMessage::Init { code: document };
    let init_ok = match init.encode() {
        Ok(text) => sink.send(WsMessage::Text(text)).await.is_ok(),
        Err(e) => {
            warn!(error = %e, "Failed to encode init message");
            false
        }
    };

    let mut writer = tokio::spawn(async move {
        while let Some(msg) = outbound_rx.recv().await {
            let text = match msg.encode() {
                Ok(text) => text,
                Err(e) => {
                    warn!(error = %e, "Failed to encode outbound message");
                    continue;
                }
            };
            if sink.send(WsMessage::Text(text)).await.is_err() {
                break;
            }
        }
        // Queue closed: the room evicted us or we left. Say goodbye.
        let _ = sink.close().await;
    });

    if init_ok {
        loop {
            tokio::select! {
                frame = stream.next() => {
                    match frame {
                        Some(Ok(WsMessage::Text(text))) => {
                            handle_frame(&text, &room_tx, &conn_id).await;
                        }
                        Some(Ok(WsMessage::Close(_))) | None => {
                            debug!("Socket closed by peer");
                            break;
                        }
                        // Binary, ping and pong frames are not part of
                        // the protocol.
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            debug!(error = %e, "Socket error");
                            break;
                        }
                    }
                }
                _ = &mut writer => {
                    debug!("Writer task ended");
                    break;
                }
            }
        }
    }

    // Single exit path: leave exactly once, whatever ended the loops.
    let _ = room_tx
        .send(RoomEvent::Leave {
            conn_id: conn_id.clone(),
        })
        .await;
    writer.abort();
    crate::metrics::dec_connected_clients();
    info!("Client disconnected");
}

/// Process one inbound text frame.
///
/// Malformed frames are dropped with the connection kept alive and
/// nothing echoed back; unknown message types are ignored.
async fn handle_frame(text: &str, room_tx: &mpsc::Sender<RoomEvent>, conn_id: &ConnId) {
    match ClientMessage::decode(text) {
        Ok(ClientMessage::CodeUpdate { code }) => {
            let _ = room_tx
                .send(RoomEvent::Update {
                    conn_id: conn_id.clone(),
                    code,
                })
                .await;
        }
        Ok(ClientMessage::Unknown) => {
            debug!("Ignoring message of unknown type");
        }
        Err(e) => {
            crate::metrics::record_malformed_message();
            debug!(error = %e, "Dropping malformed message");
        }
    }
}

/// Join `room_id`, retrying when the lookup races a room teardown.
///
/// A stale actor handle answers `RoomClosed` (or is already gone); by
/// the time the reply arrives the draining actor has removed its
/// registry entry, so the next `get_or_create` spawns a fresh room.
async fn join_room(
    registry: &Arc<RoomRegistry>,
    room_id: &str,
    conn_id: &ConnId,
    outbound_tx: mpsc::Sender<ServerMessage>,
) -> Result<(mpsc::Sender<RoomEvent>, JoinSnapshot), RoomError> {
    for attempt in 0..JOIN_RETRY_LIMIT {
        let room_tx = registry.get_or_create(room_id);
        let (reply_tx, reply_rx) = oneshot::channel();
        let sent = room_tx
            .send(RoomEvent::Join {
                conn_id: conn_id.clone(),
                sender: outbound_tx.clone(),
                reply_tx,
            })
            .await;
        if sent.is_err() {
            // Actor shut down between lookup and send.
            debug!(attempt, "Room actor gone, retrying join");
            continue;
        }

        match reply_rx.await {
            Ok(Ok(snapshot)) => return Ok((room_tx, snapshot)),
            Ok(Err(RoomError::RoomClosed)) => {
                debug!(attempt, "Joined a draining room, retrying");
                continue;
            }
            Ok(Err(e)) => return Err(e),
            // Reply dropped: actor shut down mid-join.
            Err(_) => continue,
        }
    }
    Err(RoomError::Unavailable)
}
