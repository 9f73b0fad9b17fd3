//! Common test utilities for PushSocket integration tests
//!
//! A scriptable mock WebSocket server: tests can push frames to every open
//! connection, close connections cleanly or drop them abruptly, and inspect
//! which paths clients connected to.

#![allow(dead_code)]

use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use pushsocket::{MessageRouter, PushSocketError, WsMessage};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, Notify};
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::Message;

/// Macro for verbose test output (controlled by TEST_VERBOSE env var)
#[macro_export]
macro_rules! verbose_println {
    ($($arg:tt)*) => {
        if std::env::var("TEST_VERBOSE").is_ok() {
            println!($($arg)*);
        }
    };
}

#[derive(Debug, Clone)]
pub enum ServerCommand {
    /// Send a text frame to every open connection
    Send(String),
    /// Send a close frame to every open connection
    Close,
    /// Drop every open connection without a close frame
    Drop,
}

/// A mock WebSocket server for testing
pub struct MockWsServer {
    pub addr: SocketAddr,
    commands: broadcast::Sender<ServerCommand>,
    paths: Arc<Mutex<Vec<String>>>,
    shutdown: Arc<Notify>,
}

impl MockWsServer {
    /// Create and start a new mock WebSocket server
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (commands, _) = broadcast::channel(64);
        let paths = Arc::new(Mutex::new(Vec::new()));
        let shutdown = Arc::new(Notify::new());

        let commands_clone = commands.clone();
        let paths_clone = Arc::clone(&paths);
        let shutdown_clone = Arc::clone(&shutdown);

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    result = listener.accept() => {
                        match result {
                            Ok((stream, _)) => {
                                let commands = commands_clone.subscribe();
                                let paths = Arc::clone(&paths_clone);
                                tokio::spawn(async move {
                                    Self::handle_connection(stream, commands, paths).await;
                                });
                            }
                            Err(e) => {
                                eprintln!("Accept error: {}", e);
                                break;
                            }
                        }
                    }
                    _ = shutdown_clone.notified() => {
                        break;
                    }
                }
            }
        });

        Self {
            addr,
            commands,
            paths,
            shutdown,
        }
    }

    async fn handle_connection(
        stream: tokio::net::TcpStream,
        mut commands: broadcast::Receiver<ServerCommand>,
        paths: Arc<Mutex<Vec<String>>>,
    ) {
        let record = Arc::clone(&paths);
        let callback = move |request: &Request, response: Response| -> Result<Response, ErrorResponse> {
            record.lock().push(request.uri().path().to_string());
            Ok(response)
        };

        let ws_stream = match tokio_tungstenite::accept_hdr_async(stream, callback).await {
            Ok(ws) => ws,
            Err(e) => {
                eprintln!("WebSocket handshake failed: {}", e);
                return;
            }
        };

        let (mut write, mut read) = ws_stream.split();

        loop {
            tokio::select! {
                msg = read.next() => {
                    match msg {
                        Some(Ok(msg)) => {
                            if msg.is_text() && msg.to_text().unwrap_or_default().contains("\"ping\"") {
                                if write.send(Message::Text("{\"type\":\"pong\"}".into())).await.is_err() {
                                    break;
                                }
                            } else if msg.is_close() {
                                break;
                            }
                        }
                        Some(Err(_)) | None => break,
                    }
                }
                command = commands.recv() => {
                    match command {
                        Ok(ServerCommand::Send(text)) => {
                            if write.send(Message::Text(text)).await.is_err() {
                                break;
                            }
                        }
                        Ok(ServerCommand::Close) => {
                            let _ = write.send(Message::Close(None)).await;
                            break;
                        }
                        Ok(ServerCommand::Drop) | Err(_) => break,
                    }
                }
            }
        }
    }

    /// Base WebSocket URL for this server
    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    pub fn send(&self, text: &str) {
        let _ = self.commands.send(ServerCommand::Send(text.to_string()));
    }

    pub fn close_all(&self) {
        let _ = self.commands.send(ServerCommand::Close);
    }

    pub fn drop_all(&self) {
        let _ = self.commands.send(ServerCommand::Drop);
    }

    /// Paths of every accepted connection, in accept order
    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().clone()
    }

    pub fn connection_count(&self) -> usize {
        self.paths.lock().len()
    }

    /// Shutdown the server
    pub fn shutdown(&self) {
        self.shutdown.notify_waiters();
    }
}

impl Drop for MockWsServer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Router accepting frames that parse as an unsigned integer
pub struct NumberRouter;

impl MessageRouter for NumberRouter {
    type Message = u32;

    fn parse(&self, message: &WsMessage) -> pushsocket::Result<Self::Message> {
        let text = message
            .as_text()
            .ok_or_else(|| PushSocketError::ParseError("binary frame".into()))?;
        text.trim()
            .parse()
            .map_err(|e| PushSocketError::ParseError(format!("{}: {}", text, e)))
    }
}

/// Poll `condition` every 10ms until it holds or `timeout` elapses
pub async fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}
