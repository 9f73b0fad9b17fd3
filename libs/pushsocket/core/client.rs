use crate::core::config::ClientConfig;
use crate::core::connection_state::{AtomicConnectionState, AtomicMetrics, ConnectionState};
use crate::core::heartbeat::Heartbeat;
use crate::traits::*;
use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use std::fmt::Debug;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Events delivered to the consumer of a managed connection
#[derive(Debug, Clone, PartialEq)]
pub enum SocketEvent<M> {
    /// Connection opened; emitted once per successful open
    Opened,
    /// An open connection was lost; a reconnect is already scheduled
    Closed,
    /// Typed message produced by the router
    Message(M),
}

/// State shared between the manager and every connection task it spawned
///
/// Each task is stamped with the generation that was current when it was
/// spawned. Every mutation goes through [`Shared::guarded`], which holds the
/// generation lock for the duration of the mutation, so a superseded task can
/// never touch liveness, state or the event channel.
pub(crate) struct Shared<M> {
    generation: Mutex<u64>,
    live: watch::Sender<bool>,
    pub(crate) state: AtomicConnectionState,
    pub(crate) metrics: AtomicMetrics,
    events: mpsc::UnboundedSender<SocketEvent<M>>,
}

impl<M> Shared<M>
where
    M: Send + Debug + 'static,
{
    pub(crate) fn new(events: mpsc::UnboundedSender<SocketEvent<M>>) -> Self {
        let (live, _) = watch::channel(false);
        Self {
            generation: Mutex::new(0),
            live,
            state: AtomicConnectionState::new(ConnectionState::Idle),
            metrics: AtomicMetrics::new(),
            events,
        }
    }

    /// Invalidate every outstanding task and return the new generation
    ///
    /// Liveness and state belong to the new handle from here on, so they
    /// restart at not-live and connecting. The superseded handle emits no
    /// `Closed`.
    pub(crate) fn advance(&self) -> u64 {
        let mut generation = self.generation.lock();
        *generation += 1;
        self.state.set(ConnectionState::Connecting);
        self.live.send_replace(false);
        *generation
    }

    fn guarded<T>(&self, generation: u64, apply: impl FnOnce(&Self) -> T) -> Option<T> {
        let current = self.generation.lock();
        if *current != generation {
            return None;
        }
        Some(apply(self))
    }

    pub(crate) fn is_live(&self) -> bool {
        *self.live.borrow()
    }

    pub(crate) fn subscribe_liveness(&self) -> watch::Receiver<bool> {
        self.live.subscribe()
    }

    pub(crate) fn mark_connecting(&self, generation: u64) -> bool {
        self.guarded(generation, |shared| shared.state.set(ConnectionState::Connecting))
            .is_some()
    }

    pub(crate) fn mark_open(&self, generation: u64) -> bool {
        self.guarded(generation, |shared| {
            shared.state.set(ConnectionState::Open);
            shared.live.send_replace(true);
            shared.metrics.increment_opens();
            let _ = shared.events.send(SocketEvent::Opened);
        })
        .is_some()
    }

    pub(crate) fn mark_closed(&self, generation: u64) {
        self.guarded(generation, |shared| {
            shared.state.set(ConnectionState::Closed);
            if shared.live.send_replace(false) {
                let _ = shared.events.send(SocketEvent::Closed);
            }
        });
    }

    pub(crate) fn deliver(&self, generation: u64, message: M) -> bool {
        self.guarded(generation, |shared| {
            let _ = shared.events.send(SocketEvent::Message(message));
        })
        .is_some()
    }

    /// Terminal transition; invalidates the active task before it is cancelled
    pub(crate) fn tear_down(&self) {
        let mut generation = self.generation.lock();
        *generation += 1;
        self.state.set(ConnectionState::TornDown);
        self.live.send_replace(false);
    }
}

/// Connection task: connect, pump messages, wait, reconnect, until cancelled
///
/// One task owns one session's reconnect cycle, so at most one reconnect
/// timer can be pending at any time.
pub(crate) async fn run_connection<R>(
    config: Arc<ClientConfig<R>>,
    shared: Arc<Shared<R::Message>>,
    generation: u64,
    url: String,
    cancel: CancellationToken,
) where
    R: MessageRouter,
{
    let mut attempt = 0usize;

    loop {
        if !shared.mark_connecting(generation) {
            debug!("[Push] Handle for {} superseded, exiting", url);
            break;
        }

        let connected = tokio::select! {
            _ = cancel.cancelled() => break,
            result = connect_async(url.as_str()) => result,
        };

        match connected {
            Ok((ws_stream, _)) => {
                if !shared.mark_open(generation) {
                    debug!("[Push] Opened superseded handle for {}, dropping it", url);
                    break;
                }
                info!("[Push] Connected to {}", url);
                attempt = 0;

                match handle_connection(ws_stream, &config, &shared, generation, &cancel).await {
                    Ok(()) => debug!("[Push] Connection to {} closed", url),
                    Err(e) => warn!("[Push] Connection to {} lost: {}", url, e),
                }
            }
            Err(e) => {
                warn!("[Push] Failed to connect to {}: {}", url, e);
            }
        }

        shared.mark_closed(generation);

        if cancel.is_cancelled() {
            break;
        }

        let delay = config.reconnect_strategy.next_delay(attempt);
        info!("[Push] Reconnecting in {:?} (attempt {})", delay, attempt + 1);

        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(delay) => {}
        }

        attempt += 1;
        shared.metrics.increment_reconnects();
    }

    debug!("[Push] Connection task for {} exiting", url);
}

/// Pump one open connection until it closes, fails or is cancelled
async fn handle_connection<R>(
    ws_stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    config: &ClientConfig<R>,
    shared: &Shared<R::Message>,
    generation: u64,
    cancel: &CancellationToken,
) -> Result<()>
where
    R: MessageRouter,
{
    let (mut write, mut read) = ws_stream.split();
    let mut heartbeat = Heartbeat::new(config.heartbeat.as_ref());

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("[Push] Teardown requested, closing connection");
                let _ = write.close().await;
                return Ok(());
            }

            msg = read.next() => {
                match msg {
                    Some(Ok(Message::Close(frame))) => {
                        debug!("[Push] Close frame received: {:?}", frame);
                        return Ok(());
                    }
                    Some(Ok(msg)) => {
                        let Some(ws_msg) = tungstenite_to_ws_message(msg) else {
                            continue;
                        };
                        shared.metrics.increment_received();

                        match config.router.parse(&ws_msg) {
                            Ok(message) => {
                                if !shared.deliver(generation, message) {
                                    debug!("[Push] Message arrived on superseded handle, closing");
                                    let _ = write.close().await;
                                    return Ok(());
                                }
                            }
                            Err(e) => {
                                shared.metrics.increment_parse_failures();
                                warn!("[Push] Dropping unparseable payload: {}", e);
                            }
                        }
                    }
                    Some(Err(e)) => {
                        return Err(PushSocketError::WebSocket(e.to_string()));
                    }
                    None => {
                        return Err(PushSocketError::ConnectionClosed("stream ended".into()));
                    }
                }
            }

            payload = heartbeat.tick() => {
                write
                    .send(ws_message_to_tungstenite(&payload))
                    .await
                    .map_err(|e| PushSocketError::WebSocket(format!("Failed to send heartbeat: {}", e)))?;
                debug!("[Push] Heartbeat sent");
            }
        }
    }
}

/// Convert WsMessage to tungstenite Message
fn ws_message_to_tungstenite(msg: &WsMessage) -> Message {
    match msg {
        WsMessage::Text(text) => Message::Text(text.clone()),
        WsMessage::Binary(data) => Message::Binary(data.clone()),
    }
}

/// Convert tungstenite Message to WsMessage
fn tungstenite_to_ws_message(msg: Message) -> Option<WsMessage> {
    match msg {
        Message::Text(text) => Some(WsMessage::Text(text)),
        Message::Binary(data) => Some(WsMessage::Binary(data)),
        Message::Ping(_) | Message::Pong(_) | Message::Close(_) | Message::Frame(_) => None,
    }
}
