//! Graceful shutdown management

use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Manages graceful shutdown for long-running processes
#[derive(Debug, Clone, Default)]
pub struct ShutdownManager {
    token: CancellationToken,
}

impl ShutdownManager {
    /// Create a new shutdown manager in running state
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a Ctrl+C signal handler that triggers shutdown
    pub fn spawn_signal_handler(&self) {
        let token = self.token.clone();
        tokio::spawn(async move {
            if signal::ctrl_c().await.is_ok() {
                info!("");
                info!("Received shutdown signal (Ctrl+C)");
                info!("Shutting down gracefully...");
                token.cancel();
            }
        });
    }

    /// Request shutdown from inside the process
    pub fn trigger(&self) {
        self.token.cancel();
    }

    /// Check if the process should continue running
    pub fn is_running(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Resolves once shutdown has been requested
    pub async fn wait(&self) {
        self.token.cancelled().await;
    }

    /// Child token for tasks that must stop with the process
    pub fn token(&self) -> CancellationToken {
        self.token.child_token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_trigger_stops_running_and_children() {
        let shutdown = ShutdownManager::new();
        let child = shutdown.token();
        assert!(shutdown.is_running());

        shutdown.trigger();
        shutdown.wait().await;
        assert!(!shutdown.is_running());
        assert!(child.is_cancelled());
    }
}
