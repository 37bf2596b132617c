//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use menu_service::http::{MenuServer, ServerError};
use menu_service::lifecycle::Shutdown;
use menu_service::ServiceConfig;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A menu server running on an ephemeral local port.
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown: Shutdown,
    handle: JoinHandle<Result<(), ServerError>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Trigger shutdown and wait for the server to finish.
    pub async fn stop(self) -> Result<(), ServerError> {
        self.begin_stop();
        self.join().await
    }

    /// Trigger shutdown without waiting, leaving the server draining.
    pub fn begin_stop(&self) {
        self.shutdown.trigger();
    }

    /// Wait for a server whose shutdown was already triggered.
    pub async fn join(self) -> Result<(), ServerError> {
        tokio::time::timeout(Duration::from_secs(10), self.handle)
            .await
            .expect("server did not stop")
            .expect("server task panicked")
    }
}

#[allow(dead_code)]
/// Start `server` on 127.0.0.1 with an OS-assigned port.
pub async fn start(server: MenuServer) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    let handle = tokio::spawn(server.run(listener, server_shutdown));

    TestServer {
        addr,
        shutdown,
        handle,
    }
}

/// Start a server with default configuration.
#[allow(dead_code)]
pub async fn start_default() -> TestServer {
    start(MenuServer::new(ServiceConfig::default())).await
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .unwrap()
}
