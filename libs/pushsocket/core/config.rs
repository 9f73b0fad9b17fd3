use crate::traits::*;
use std::sync::Arc;
use std::time::Duration;

/// Configuration for a [`ConnectionManager`](crate::ConnectionManager)
///
/// Built with the type-state builder; immutable once the manager exists.
pub struct ClientConfig<R>
where
    R: MessageRouter,
{
    /// Base WebSocket URL (ws:// or wss://); the connect scope is appended as a path segment
    pub(crate) endpoint: String,

    /// Router turning frames into typed messages
    pub(crate) router: Arc<R>,

    /// Delay policy between reconnection attempts
    pub(crate) reconnect_strategy: Box<dyn ReconnectionStrategy>,

    /// Optional keepalive (interval, payload) sent while the connection is open
    pub(crate) heartbeat: Option<(Duration, WsMessage)>,
}

impl<R> ClientConfig<R>
where
    R: MessageRouter,
{
    /// Get a reference to the base endpoint
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// URL of the connection scoped to `scope`
    pub fn url_for(&self, scope: &str) -> String {
        format!("{}/{}", self.endpoint.trim_end_matches('/'), scope)
    }

    /// Check if heartbeat is configured
    pub fn has_heartbeat(&self) -> bool {
        self.heartbeat.is_some()
    }
}
