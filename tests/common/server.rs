use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use pairpad::api;
use pairpad::state::RoomRegistry;

/// An in-process server bound to an ephemeral port.
pub struct TestServer {
    addr: SocketAddr,
    /// Handle into server state, for asserting on room lifecycle.
    pub registry: Arc<RoomRegistry>,
    task: JoinHandle<()>,
}

impl TestServer {
    pub async fn spawn() -> Self {
        let registry = RoomRegistry::new();
        let app = api::router(Arc::clone(&registry));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");

        let task = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("server run");
        });

        Self {
            addr,
            registry,
            task,
        }
    }

    pub fn http_base(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_base(&self) -> String {
        format!("ws://{}", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}
