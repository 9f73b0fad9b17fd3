//! Common test utilities for shopsync integration tests
//!
//! - `MockPushServer`: order push channel speaking the service's JSON dialect
//! - `InMemoryShop`: `ShopApi` double holding one account and an order list

#![allow(dead_code)]

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use shopsync::infrastructure::client::Result as ApiResult;
use shopsync::{Account, ApiError, Identity, Order, OrderDraft, OrderStatus, ShopApi};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
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
enum ServerCommand {
    Send(String),
    Drop,
}

/// Mock of the order service push endpoint (`/ws/{user_id}`)
pub struct MockPushServer {
    pub addr: SocketAddr,
    commands: broadcast::Sender<ServerCommand>,
    paths: Arc<Mutex<Vec<String>>>,
    shutdown: Arc<Notify>,
}

impl MockPushServer {
    /// Start a server that greets every connection with `connection_established`
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
                        let Ok((stream, _)) = result else { break };
                        let commands = commands_clone.subscribe();
                        let paths = Arc::clone(&paths_clone);
                        tokio::spawn(Self::handle_connection(stream, commands, paths));
                    }
                    _ = shutdown_clone.notified() => break,
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
        let callback = move |request: &Request, response: Response| -> Result<Response, ErrorResponse> {
            paths.lock().push(request.uri().path().to_string());
            Ok(response)
        };

        let Ok(ws_stream) = tokio_tungstenite::accept_hdr_async(stream, callback).await else {
            return;
        };
        let (mut write, mut read) = ws_stream.split();

        let welcome = r#"{"type":"connection_established","message":"Connected to order service"}"#;
        if write.send(Message::Text(welcome.into())).await.is_err() {
            return;
        }

        loop {
            tokio::select! {
                msg = read.next() => match msg {
                    Some(Ok(Message::Text(text))) if text.contains("\"ping\"") => {
                        if write.send(Message::Text(r#"{"type":"pong"}"#.into())).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                },
                command = commands.recv() => match command {
                    Ok(ServerCommand::Send(text)) => {
                        if write.send(Message::Text(text)).await.is_err() {
                            break;
                        }
                    }
                    Ok(ServerCommand::Drop) | Err(_) => break,
                },
            }
        }
    }

    /// Base push URL, without the identity segment
    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    pub fn send(&self, text: &str) {
        let _ = self.commands.send(ServerCommand::Send(text.to_string()));
    }

    pub fn send_order_update(&self, order_id: i64, status: OrderStatus) {
        self.send(&format!(
            r#"{{"type":"order_update","order_id":{},"user_id":1,"status":"{}","amount":10.0}}"#,
            order_id, status
        ));
    }

    /// Drop every connection without a close frame
    pub fn drop_all(&self) {
        let _ = self.commands.send(ServerCommand::Drop);
    }

    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().clone()
    }

    pub fn connections_to(&self, path: &str) -> usize {
        self.paths.lock().iter().filter(|p| p.as_str() == path).count()
    }
}

impl Drop for MockPushServer {
    fn drop(&mut self) {
        self.shutdown.notify_waiters();
    }
}

/// In-memory stand-in for the gateway
#[derive(Default)]
pub struct InMemoryShop {
    pub account: Mutex<Option<Account>>,
    pub orders: Mutex<Vec<Order>>,
    pub reject_writes: AtomicBool,
    pub account_fetches: AtomicUsize,
    pub order_fetches: AtomicUsize,
    pub identities: Mutex<Vec<u64>>,
}

impl InMemoryShop {
    pub fn with_account(balance: f64) -> Self {
        let shop = Self::default();
        *shop.account.lock() = Some(Account {
            id: 1,
            user_id: Some(1),
            balance,
            created_at: None,
        });
        shop
    }

    pub fn add_order(&self, id: i64, amount: f64, status: OrderStatus) {
        self.orders.lock().push(Order {
            id,
            user_id: Some(1),
            amount,
            description: Some(format!("order {}", id)),
            status,
            created_at: None,
        });
    }

    pub fn set_status(&self, id: i64, status: OrderStatus) {
        if let Some(order) = self.orders.lock().iter_mut().find(|o| o.id == id) {
            order.status = status;
        }
    }

    pub fn fetches(&self) -> usize {
        self.account_fetches.load(Ordering::SeqCst)
    }

    fn record(&self, identity: Identity) {
        self.identities.lock().push(identity.get());
    }

    fn rejected(&self) -> Option<ApiError> {
        self.reject_writes.load(Ordering::SeqCst).then(|| ApiError::Rejected {
            status: 400,
            body: "rejected".to_string(),
        })
    }
}

#[async_trait]
impl ShopApi for InMemoryShop {
    async fn get_account(&self, identity: Identity) -> ApiResult<Option<Account>> {
        self.record(identity);
        self.account_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.account.lock().clone())
    }

    async fn create_account(&self, identity: Identity) -> ApiResult<()> {
        self.record(identity);
        if let Some(e) = self.rejected() {
            return Err(e);
        }
        let mut account = self.account.lock();
        if account.is_some() {
            return Err(ApiError::Rejected {
                status: 400,
                body: "Account already exists".to_string(),
            });
        }
        *account = Some(Account {
            id: 1,
            user_id: Some(identity.get() as i64),
            balance: 0.0,
            created_at: None,
        });
        Ok(())
    }

    async fn topup(&self, identity: Identity, amount: f64) -> ApiResult<()> {
        self.record(identity);
        if let Some(e) = self.rejected() {
            return Err(e);
        }
        if amount <= 0.0 {
            return Err(ApiError::Rejected {
                status: 422,
                body: "Amount must be positive".to_string(),
            });
        }
        match self.account.lock().as_mut() {
            Some(account) => {
                account.balance += amount;
                Ok(())
            }
            None => Err(ApiError::Rejected {
                status: 404,
                body: "Account not found".to_string(),
            }),
        }
    }

    async fn list_orders(&self, identity: Identity) -> ApiResult<Vec<Order>> {
        self.record(identity);
        self.order_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.orders.lock().clone())
    }

    async fn create_order(&self, identity: Identity, draft: &OrderDraft) -> ApiResult<Order> {
        self.record(identity);
        if let Some(e) = self.rejected() {
            return Err(e);
        }
        let mut orders = self.orders.lock();
        let order = Order {
            id: orders.len() as i64 + 1,
            user_id: Some(identity.get() as i64),
            amount: draft.amount,
            description: draft.description.clone(),
            status: OrderStatus::New,
            created_at: None,
        };
        orders.push(order.clone());
        Ok(order)
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
