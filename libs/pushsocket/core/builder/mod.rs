pub mod states;

use crate::core::client::SocketEvent;
use crate::core::config::ClientConfig;
use crate::manager::ConnectionManager;
use crate::traits::*;
use states::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Type-state builder for [`ConnectionManager`]
///
/// `E` is [`Missing`] until [`endpoint`](Self::endpoint) is called and `R` is
/// [`Missing`] until [`router`](Self::router) is called. Everything else has
/// defaults (3 second fixed reconnect delay, no heartbeat).
pub struct ConnectionManagerBuilder<E, R> {
    endpoint: E,
    router: R,
    reconnect_strategy: Option<Box<dyn ReconnectionStrategy>>,
    heartbeat: Option<(Duration, WsMessage)>,
}

impl ConnectionManagerBuilder<Missing, Missing> {
    pub fn new() -> Self {
        Self {
            endpoint: Missing,
            router: Missing,
            reconnect_strategy: None,
            heartbeat: None,
        }
    }
}

impl Default for ConnectionManagerBuilder<Missing, Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> ConnectionManagerBuilder<Missing, R> {
    /// Base URL; `connect(scope)` opens `{endpoint}/{scope}`
    pub fn endpoint(self, endpoint: impl Into<String>) -> ConnectionManagerBuilder<Endpoint, R> {
        ConnectionManagerBuilder {
            endpoint: Endpoint::new(endpoint),
            router: self.router,
            reconnect_strategy: self.reconnect_strategy,
            heartbeat: self.heartbeat,
        }
    }
}

impl<E> ConnectionManagerBuilder<E, Missing> {
    pub fn router<R>(self, router: R) -> ConnectionManagerBuilder<E, R>
    where
        R: MessageRouter,
    {
        ConnectionManagerBuilder {
            endpoint: self.endpoint,
            router,
            reconnect_strategy: self.reconnect_strategy,
            heartbeat: self.heartbeat,
        }
    }
}

impl<E, R> ConnectionManagerBuilder<E, R> {
    pub fn reconnect_strategy(mut self, strategy: impl ReconnectionStrategy + 'static) -> Self {
        self.reconnect_strategy = Some(Box::new(strategy));
        self
    }

    /// Shorthand for a [`FixedDelay`] strategy
    pub fn reconnect_delay(self, delay: Duration) -> Self {
        self.reconnect_strategy(FixedDelay::new(delay))
    }

    /// Send `payload` every `interval` while a connection is open
    pub fn heartbeat(mut self, interval: Duration, payload: WsMessage) -> Self {
        self.heartbeat = Some((interval, payload));
        self
    }
}

impl<R> ConnectionManagerBuilder<Endpoint, R>
where
    R: MessageRouter,
{
    /// Build the manager and the receiving end of its event channel
    ///
    /// No connection is opened until [`ConnectionManager::connect`] is called.
    pub fn build(
        self,
    ) -> Result<(ConnectionManager<R>, mpsc::UnboundedReceiver<SocketEvent<R::Message>>)> {
        let endpoint = self.endpoint.validate()?;

        if let Some((interval, _)) = &self.heartbeat {
            if interval.is_zero() {
                return Err(PushSocketError::Configuration(
                    "heartbeat interval must be greater than 0".into(),
                ));
            }
        }

        let config = ClientConfig {
            endpoint,
            router: Arc::new(self.router),
            reconnect_strategy: self
                .reconnect_strategy
                .unwrap_or_else(|| Box::new(FixedDelay::default())),
            heartbeat: self.heartbeat,
        };

        Ok(ConnectionManager::new(config))
    }
}
