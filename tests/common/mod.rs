// Shared harness: a real tool server on an ephemeral port.

#![allow(dead_code)]

use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tweetmind_core::client::{ClientOptions, McpClient};
use tweetmind_core::registry::{ToolRegistry, UpstreamError, handler_fn};
use tweetmind_core::schema::Parameters;
use tweetmind_core::tool::{ToolDescriptor, ToolResult};
use tweetmind_core::server::serve_with_listener;
use tweetmind_core::tools::register_builtin_tools;

pub struct TestServer {
    pub addr: SocketAddr,
    pub registry: Arc<ToolRegistry>,
    task: JoinHandle<()>,
}

impl TestServer {
    /// Serves the built-in tools without a social client.
    pub async fn start() -> Self {
        let mut registry = ToolRegistry::new();
        register_builtin_tools(&mut registry, None).expect("register builtin tools");
        Self::with_registry(registry).await
    }

    pub async fn with_registry(registry: ToolRegistry) -> Self {
        let registry = Arc::new(registry);
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let served = Arc::clone(&registry);
        let task = tokio::spawn(async move {
            let _ = serve_with_listener(listener, served).await;
        });
        Self {
            addr,
            registry,
            task,
        }
    }

    pub fn sse_url(&self) -> String {
        format!("http://{}/sse", self.addr)
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    pub async fn connect(&self) -> McpClient {
        McpClient::connect(&self.sse_url(), ClientOptions::default())
            .await
            .expect("client connects")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// A server on its own runtime. Stopping it shuts that runtime down, so
/// every open stream is cut, the way a crashed server would cut them.
pub struct StoppableServer {
    pub addr: SocketAddr,
    stop: Option<oneshot::Sender<()>>,
    thread: Option<std::thread::JoinHandle<()>>,
}

impl StoppableServer {
    pub fn start(registry: ToolRegistry) -> Self {
        let (addr_tx, addr_rx) = std::sync::mpsc::channel();
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let thread = std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(2)
                .enable_all()
                .build()
                .expect("server runtime");
            runtime.block_on(async move {
                let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
                addr_tx
                    .send(listener.local_addr().expect("local addr"))
                    .expect("report address");
                tokio::select! {
                    _ = serve_with_listener(listener, Arc::new(registry)) => {}
                    _ = stop_rx => {}
                }
            });
            runtime.shutdown_background();
        });
        let addr = addr_rx.recv().expect("server address");
        Self {
            addr,
            stop: Some(stop_tx),
            thread: Some(thread),
        }
    }

    pub fn sse_url(&self) -> String {
        format!("http://{}/sse", self.addr)
    }

    pub fn stop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for StoppableServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Registry with a single `hang` tool that never answers.
pub fn hanging_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry
        .register(
            ToolDescriptor::new("hang", "Never answers", Parameters::new()),
            handler_fn(|_arguments: Value| {
                std::future::pending::<Result<ToolResult, UpstreamError>>()
            }),
        )
        .expect("register hang");
    registry
}
