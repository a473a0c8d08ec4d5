use crate::application::registry::ToolRegistry;
use crate::application::service::McpService;
use crate::application::transport::SessionManager;
use std::sync::Arc;
use std::time::Instant;

pub struct ServerState {
    sessions: SessionManager,
    started_at: Instant,
}

impl ServerState {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            sessions: SessionManager::new(Arc::new(McpService::new(registry))),
            started_at: Instant::now(),
        }
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
