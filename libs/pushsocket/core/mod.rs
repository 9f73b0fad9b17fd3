//! # PushSocket core
//!
//! Connection loop, configuration and state tracking behind
//! [`ConnectionManager`](crate::ConnectionManager).
//!
//! ## Example
//!
//! ```rust,ignore
//! let (manager, mut events) = pushsocket::builder()
//!     .endpoint("ws://localhost:8000/ws")
//!     .router(MyRouter)
//!     .reconnect_strategy(FixedDelay::new(Duration::from_secs(3)))
//!     .heartbeat(Duration::from_secs(30), WsMessage::from("{\"type\":\"ping\"}"))
//!     .build()?;
//!
//! // Opens ws://localhost:8000/ws/1
//! manager.connect(1);
//!
//! while let Some(event) = events.recv().await {
//!     match event {
//!         SocketEvent::Opened => println!("online"),
//!         SocketEvent::Closed => println!("offline, retrying"),
//!         SocketEvent::Message(message) => println!("{:?}", message),
//!     }
//! }
//! ```

pub mod builder;
pub mod client;
pub mod config;
pub mod connection_state;
pub mod heartbeat;

// Re-export main types
pub use builder::{states, ConnectionManagerBuilder};
pub use client::SocketEvent;
pub use config::ClientConfig;
pub use connection_state::{AtomicConnectionState, AtomicMetrics, ConnectionState, Metrics};

// Re-export traits for convenience
pub use crate::traits::*;
