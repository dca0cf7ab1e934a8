use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use pairpad_proto::{ClientMessage, ServerMessage};

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, WsMessage>;
type WsStream = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// A raw WebSocket client speaking the room protocol.
pub struct TestWsClient {
    sink: WsSink,
    stream: WsStream,
}

impl TestWsClient {
    pub async fn connect(ws_base: &str, room_id: &str) -> Self {
        let url = format!("{ws_base}/ws/{room_id}");
        let (socket, _) = connect_async(&url).await.expect("websocket connect");
        let (sink, stream) = socket.split();
        Self { sink, stream }
    }

    pub async fn send(&mut self, msg: ClientMessage) {
        let text = msg.encode().expect("encode client message");
        self.send_raw(&text).await;
    }

    pub async fn send_raw(&mut self, text: &str) {
        self.sink
            .send(WsMessage::Text(text.to_string()))
            .await
            .expect("send frame");
    }

    /// Receive the next protocol message, skipping non-text frames.
    /// Panics on close, stream end, or timeout.
    pub async fn recv(&mut self) -> ServerMessage {
        timeout(RECV_TIMEOUT, async {
            loop {
                match self.stream.next().await {
                    Some(Ok(WsMessage::Text(text))) => {
                        return ServerMessage::decode(&text).expect("decode server message");
                    }
                    Some(Ok(WsMessage::Close(_))) | None => panic!("connection closed"),
                    Some(Ok(_)) => continue,
                    Some(Err(err)) => panic!("websocket error: {err}"),
                }
            }
        })
        .await
        .expect("timed out waiting for server message")
    }

    /// Receive messages until one matches `pred`, returning it.
    pub async fn recv_until<F>(&mut self, mut pred: F) -> ServerMessage
    where
        F: FnMut(&ServerMessage) -> bool,
    {
        timeout(RECV_TIMEOUT, async {
            loop {
                let msg = self.recv().await;
                if pred(&msg) {
                    return msg;
                }
            }
        })
        .await
        .expect("timed out waiting for matching server message")
    }

    /// Assert that nothing arrives within `window`.
    pub async fn assert_silent(&mut self, window: Duration) {
        let got = timeout(window, self.stream.next()).await;
        if let Ok(Some(Ok(WsMessage::Text(text)))) = got {
            panic!("expected silence, got: {text}");
        }
    }

    pub async fn close(mut self) {
        let _ = self.sink.send(WsMessage::Close(None)).await;
        let _ = self.sink.close().await;
    }
}
