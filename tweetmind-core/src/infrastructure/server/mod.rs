//! HTTP surface of the tool server: the SSE stream, the addressed message
//! endpoint and a health probe.

mod error;
mod router;
mod routes;
mod state;

pub use error::ServerError;
pub use router::router;
pub use state::ServerState;

use crate::application::registry::ToolRegistry;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

pub async fn serve(registry: Arc<ToolRegistry>, addr: SocketAddr) -> Result<(), ServerError> {
    info!(%addr, "Binding tool server");
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    serve_with_listener(listener, registry).await
}

/// Serves on an already bound listener, e.g. one bound to port 0.
pub async fn serve_with_listener(
    listener: TcpListener,
    registry: Arc<ToolRegistry>,
) -> Result<(), ServerError> {
    let addr = listener.local_addr()?;
    let app = router(Arc::new(ServerState::new(registry)));
    info!(%addr, "Tool server ready to accept connections");

    axum::serve(listener, app.into_make_service())
        .await
        .map_err(ServerError::Serve)
}
