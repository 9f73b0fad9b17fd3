//! Message Routing
//!
//! A router turns each inbound data frame into a typed message before it is
//! handed to the consumer of the connection's event channel.
//!
//! ```text
//! WebSocket → WsMessage → Router::parse ─┬─ Ok(message) → SocketEvent::Message → consumer
//!                                        └─ Err(e)      → logged, dropped
//! ```
//!
//! Messages are delivered in arrival order. A parse failure affects only the
//! offending frame; the connection stays open.

use crate::{Result, WsMessage};
use std::fmt::Debug;

/// Message router that parses WebSocket frames into typed messages
///
/// # Example
///
/// ```ignore
/// struct EchoRouter;
///
/// impl MessageRouter for EchoRouter {
///     type Message = String;
///
///     fn parse(&self, message: &WsMessage) -> Result<Self::Message> {
///         message
///             .as_text()
///             .map(str::to_string)
///             .ok_or_else(|| PushSocketError::ParseError("binary frame".into()))
///     }
/// }
/// ```
pub trait MessageRouter: Send + Sync + 'static {
    /// The parsed message type
    type Message: Send + Debug + 'static;

    /// Parse a raw WebSocket frame into a typed message
    ///
    /// Called once per data frame on the connection task, so keep it cheap.
    fn parse(&self, message: &WsMessage) -> Result<Self::Message>;
}
