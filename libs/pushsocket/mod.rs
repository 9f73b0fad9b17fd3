//! # PushSocket
//!
//! A resilient, identity-scoped WebSocket client for server push channels.
//!
//! ## Features
//!
//! - **One handle per scope**: `connect()` replaces the active connection and
//!   invalidates every callback of the superseded one
//! - **Fixed-delay reconnection**: every close, clean or abrupt, schedules exactly
//!   one reconnect attempt; retries never stop until teardown
//! - **Liveness signal**: a `watch` channel flips on open and close
//! - **Typed routing**: a pluggable `MessageRouter` turns raw frames into typed
//!   messages; parse failures are logged and dropped, never fatal
//! - **Deterministic teardown**: pending reconnect timers are cancelled through a
//!   cancellation token owned by the manager

pub mod core;
pub mod manager;
pub mod traits;

// Re-export all traits
pub use traits::*;

// Re-export core client functionality
pub use core::{
    builder::{states, ConnectionManagerBuilder},
    client::SocketEvent,
    config::ClientConfig,
    connection_state::{AtomicConnectionState, AtomicMetrics, ConnectionState, Metrics},
};

// Re-export manager
pub use manager::ConnectionManager;

/// Create a new connection manager builder
pub fn builder() -> ConnectionManagerBuilder<states::Missing, states::Missing> {
    ConnectionManagerBuilder::new()
}

/// Type alias for Result with PushSocketError
pub type Result<T> = std::result::Result<T, traits::PushSocketError>;
