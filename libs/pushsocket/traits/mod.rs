//! # PushSocket Traits
//!
//! Core traits and types shared by the connection layer:
//!
//! - **MessageRouter**: Turn raw WebSocket frames into typed messages
//! - **ReconnectionStrategy**: Control the delay between reconnection attempts
//! - **WsMessage**: Transport-agnostic frame representation

pub mod error;
pub mod parser;
pub mod reconnect;
pub mod router;

// Re-export commonly used types
pub use error::{PushSocketError, Result};
pub use parser::WsMessage;
pub use reconnect::{FixedDelay, ReconnectionStrategy};
pub use router::MessageRouter;
