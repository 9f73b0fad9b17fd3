use crate::core::client::{run_connection, Shared, SocketEvent};
use crate::core::config::ClientConfig;
use crate::core::connection_state::{ConnectionState, Metrics};
use crate::traits::MessageRouter;
use parking_lot::Mutex;
use std::fmt::Display;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// The one live connection handle owned by the manager
struct ActiveHandle {
    scope: String,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// Manager for one scoped, self-healing WebSocket connection
///
/// At most one connection handle is active at a time. Calling
/// [`connect`](Self::connect) again replaces the handle: the old one is
/// cancelled and its callbacks are invalidated before the new one starts, so a
/// late close or message from it can never change liveness or reach the event
/// channel.
///
/// Every close, clean or abrupt, schedules exactly one reconnect after the
/// strategy's delay. Only [`teardown`](Self::teardown) stops the cycle.
///
/// # Type Parameters
/// - `R`: MessageRouter implementation
pub struct ConnectionManager<R>
where
    R: MessageRouter,
{
    config: Arc<ClientConfig<R>>,
    shared: Arc<Shared<R::Message>>,
    active: Mutex<Option<ActiveHandle>>,
}

impl<R> ConnectionManager<R>
where
    R: MessageRouter,
{
    pub(crate) fn new(
        config: ClientConfig<R>,
    ) -> (Self, mpsc::UnboundedReceiver<SocketEvent<R::Message>>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let manager = Self {
            config: Arc::new(config),
            shared: Arc::new(Shared::new(event_tx)),
            active: Mutex::new(None),
        };
        (manager, event_rx)
    }

    /// Open a connection scoped to `scope`, replacing any active one
    ///
    /// Must be called from within a Tokio runtime. Connection failures are
    /// never returned; they feed the reconnect cycle.
    pub fn connect(&self, scope: impl Display) {
        let scope = scope.to_string();
        let url = self.config.url_for(&scope);

        let mut active = self.active.lock();
        let generation = self.shared.advance();

        if let Some(previous) = active.take() {
            info!("[Push] Replacing connection for scope {}", previous.scope);
            previous.cancel.cancel();
        }

        debug!("[Push] Starting connection {} (generation {})", url, generation);

        let cancel = CancellationToken::new();
        let task = tokio::spawn(run_connection(
            Arc::clone(&self.config),
            Arc::clone(&self.shared),
            generation,
            url,
            cancel.clone(),
        ));

        *active = Some(ActiveHandle {
            scope,
            cancel,
            task,
        });
    }

    /// Stop the cycle: cancel any pending reconnect and close the active handle
    ///
    /// Waits for the connection task to exit. No reconnect is scheduled after
    /// this returns.
    pub async fn teardown(&self) {
        let previous = {
            let mut active = self.active.lock();
            self.shared.tear_down();
            active.take()
        };

        if let Some(handle) = previous {
            info!("[Push] Tearing down connection for scope {}", handle.scope);
            handle.cancel.cancel();
            if let Err(e) = handle.task.await {
                warn!("[Push] Connection task ended abnormally: {}", e);
            }
        }
    }

    /// Current liveness: true between open and close of the active handle
    #[inline]
    pub fn is_live(&self) -> bool {
        self.shared.is_live()
    }

    /// Subscribe to liveness changes
    pub fn liveness(&self) -> watch::Receiver<bool> {
        self.shared.subscribe_liveness()
    }

    #[inline]
    pub fn state(&self) -> ConnectionState {
        self.shared.state.get()
    }

    pub fn metrics(&self) -> Metrics {
        self.shared.metrics.snapshot(self.state())
    }

    /// Scope of the active handle, if any
    pub fn scope(&self) -> Option<String> {
        self.active.lock().as_ref().map(|handle| handle.scope.clone())
    }

    pub fn config(&self) -> &ClientConfig<R> {
        &self.config
    }
}

impl<R> Drop for ConnectionManager<R>
where
    R: MessageRouter,
{
    fn drop(&mut self) {
        self.shared.tear_down();
        if let Some(handle) = self.active.get_mut().take() {
            handle.cancel.cancel();
        }
    }
}
