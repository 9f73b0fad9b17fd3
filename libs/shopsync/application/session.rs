//! One identity's live dashboard session
//!
//! A session owns the push connection scoped to its identity, the store
//! holding that identity's snapshot, and the task pumping push events into
//! the store. Nothing in it is shared with other identities.

use super::store::StateStore;
use crate::domain::notification::SHORT_DURATION;
use crate::domain::{Identity, Notification, Notifier, PushEvent, ShopState};
use crate::infrastructure::{DashboardConfig, ShopApi, ShopRouter};
use parking_lot::Mutex;
use pushsocket::{ConnectionManager, Metrics, SocketEvent};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Connection and timing parameters shared by every session of a host
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Push channel base URL; the identity is appended as a path segment
    pub push_url: String,
    pub reconnect_delay: Duration,
    pub heartbeat: Option<Duration>,
    pub order_refresh_delay: Duration,
}

impl SessionSettings {
    pub fn new(push_url: impl Into<String>) -> Self {
        Self {
            push_url: push_url.into(),
            reconnect_delay: Duration::from_secs(3),
            heartbeat: None,
            order_refresh_delay: Duration::from_secs(1),
        }
    }

    pub fn from_config(config: &DashboardConfig) -> Self {
        Self {
            push_url: config.push.url.clone(),
            reconnect_delay: config.reconnect_delay(),
            heartbeat: config.heartbeat_interval(),
            order_refresh_delay: config.order_refresh_delay(),
        }
    }
}

pub struct Session {
    identity: Identity,
    store: Arc<StateStore>,
    connection: ConnectionManager<ShopRouter>,
    cancel: CancellationToken,
    pump: Mutex<Option<JoinHandle<()>>>,
}

impl Session {
    /// Open the push connection for `identity` and kick off the initial refresh
    ///
    /// Must be called from within a Tokio runtime. Fails only when the push
    /// settings are invalid; connection problems are retried in the background.
    pub fn start(
        identity: Identity,
        api: Arc<dyn ShopApi>,
        notifier: Arc<dyn Notifier>,
        settings: &SessionSettings,
    ) -> pushsocket::Result<Self> {
        let mut builder = pushsocket::builder()
            .endpoint(settings.push_url.as_str())
            .router(ShopRouter)
            .reconnect_delay(settings.reconnect_delay);
        if let Some(interval) = settings.heartbeat {
            builder = builder.heartbeat(interval, ShopRouter::heartbeat_payload());
        }
        let (connection, events) = builder.build()?;

        let cancel = CancellationToken::new();
        let store = Arc::new(StateStore::new(
            identity,
            api,
            Arc::clone(&notifier),
            settings.order_refresh_delay,
            cancel.child_token(),
        ));

        info!(
            "[Session] Starting session for user {} via {} (heartbeat: {})",
            identity,
            connection.config().endpoint(),
            connection.config().has_heartbeat()
        );
        connection.connect(identity);

        let pump = tokio::spawn(pump_events(
            events,
            Arc::clone(&store),
            notifier,
            cancel.clone(),
        ));

        let initial = Arc::clone(&store);
        tokio::spawn(async move {
            initial.refresh().await;
        });

        Ok(Self {
            identity,
            store,
            connection,
            cancel,
            pump: Mutex::new(Some(pump)),
        })
    }

    pub fn identity(&self) -> Identity {
        self.identity
    }

    pub fn store(&self) -> &Arc<StateStore> {
        &self.store
    }

    pub fn snapshot(&self) -> ShopState {
        self.store.snapshot()
    }

    /// User-driven reload
    pub async fn refresh(&self) -> bool {
        self.store.refresh().await
    }

    pub fn is_live(&self) -> bool {
        self.connection.is_live()
    }

    pub fn liveness(&self) -> watch::Receiver<bool> {
        self.connection.liveness()
    }

    pub fn metrics(&self) -> Metrics {
        self.connection.metrics()
    }

    /// Stop timers, close the push connection and wait for the event pump
    ///
    /// A fetch already in flight may still land in this session's store.
    pub async fn teardown(&self) {
        info!("[Session] Tearing down session for user {}", self.identity);
        self.cancel.cancel();
        self.connection.teardown().await;

        let pump = self.pump.lock().take();
        if let Some(pump) = pump {
            let _ = pump.await;
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn pump_events(
    mut events: mpsc::UnboundedReceiver<SocketEvent<PushEvent>>,
    store: Arc<StateStore>,
    notifier: Arc<dyn Notifier>,
    cancel: CancellationToken,
) {
    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            event = events.recv() => match event {
                Some(event) => event,
                None => break,
            },
        };

        match event {
            SocketEvent::Opened => {
                info!("[Session] Push channel open for user {}", store.identity());
                notifier.notify(
                    Notification::success("Connected to server").with_duration(SHORT_DURATION),
                );
            }
            SocketEvent::Closed => {
                warn!("[Session] Push channel lost, reconnect scheduled");
            }
            SocketEvent::Message(event) => handle_push(&store, notifier.as_ref(), event),
        }
    }

    debug!("[Session] Event pump for user {} stopped", store.identity());
}

fn handle_push(store: &Arc<StateStore>, notifier: &dyn Notifier, event: PushEvent) {
    match &event {
        PushEvent::OrderUpdate(update) => {
            info!("[Session] Order #{} is now {}", update.order_id, update.status)
        }
        PushEvent::Welcome { message } => {
            debug!("[Session] Server greeting: {}", message.as_deref().unwrap_or("-"))
        }
        PushEvent::Pong => debug!("[Session] Keepalive acknowledged"),
        PushEvent::Ignored { event_type } => {
            debug!("[Session] Ignoring push event {:?}", event_type)
        }
    }

    if let Some(notification) = event.notification() {
        notifier.notify(notification);
    }

    if event.requires_refresh() {
        let store = Arc::clone(store);
        tokio::spawn(async move {
            store.refresh().await;
        });
    }
}
