//! WebSocket room session: a [`SyncAgent`] wired to a live transport.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::debug;

use pairpad_proto::ServerMessage;

use crate::error::ClientError;
use crate::sync::SyncAgent;

/// A connected room session. Dropping it (or calling [`close`]) tears
/// down the reader and writer tasks.
///
/// [`close`]: RoomClient::close
pub struct RoomClient {
    agent: Arc<Mutex<SyncAgent>>,
    writer: JoinHandle<()>,
    reader: JoinHandle<()>,
}

impl RoomClient {
    /// Connect to `ws_base/ws/{room_id}` and start synchronizing.
    ///
    /// `ws_base` is a WebSocket origin such as `ws://127.0.0.1:8000`.
    pub async fn connect(ws_base: &str, room_id: &str) -> Result<Self, ClientError> {
        let url = format!("{}/ws/{}", ws_base.trim_end_matches('/'), room_id);
        let (socket, _) = connect_async(&url).await?;
        let (mut sink, mut stream) = socket.split();

        let (mut agent, mut outbound_rx) = SyncAgent::new();
        agent.set_transport_open(true);
        let agent = Arc::new(Mutex::new(agent));

        let writer = tokio::spawn(async move {
            while let Some(msg) = outbound_rx.recv().await {
                let text = match msg.encode() {
                    Ok(text) => text,
                    Err(err) => {
                        debug!(%err, "Dropping unencodable outbound message");
                        continue;
                    }
                };
                if sink.send(WsMessage::Text(text)).await.is_err() {
                    break;
                }
            }
            let _ = sink.close().await;
        });

        let reader = {
            let agent = Arc::clone(&agent);
            tokio::spawn(async move {
                while let Some(frame) = stream.next().await {
                    match frame {
                        Ok(WsMessage::Text(text)) => match ServerMessage::decode(&text) {
                            Ok(msg) => agent.lock().apply_remote(msg),
                            Err(err) => debug!(%err, "Dropping undecodable server frame"),
                        },
                        Ok(WsMessage::Close(_)) | Err(_) => break,
                        Ok(_) => {}
                    }
                }
                agent.lock().set_transport_open(false);
            })
        };

        Ok(Self {
            agent,
            writer,
            reader,
        })
    }

    /// Record a local edit, which the session sends to the room.
    pub fn local_edit(&self, text: impl Into<String>) {
        self.agent.lock().local_edit(text);
    }

    /// Current document value as this session knows it.
    pub fn document(&self) -> String {
        self.agent.lock().document().to_string()
    }

    /// Member count as last reported by the server.
    pub fn member_count(&self) -> usize {
        self.agent.lock().member_count()
    }

    /// Tear the session down.
    pub fn close(self) {
        self.agent.lock().set_transport_open(false);
        self.writer.abort();
        self.reader.abort();
    }
}

impl Drop for RoomClient {
    fn drop(&mut self) {
        self.writer.abort();
        self.reader.abort();
    }
}
