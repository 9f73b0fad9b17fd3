//! Infrastructure Layer
//!
//! Implementations of external interfaces (REST API, push channel, config,
//! logging, notification sinks). Depends on the domain layer only.

pub mod client;
pub mod config;
pub mod logging;
pub mod notifier;
pub mod shutdown;

// Re-export commonly used types from client
pub use client::{push::ShopRouter, rest::RestClient, ApiError, ShopApi};

// Re-export config types
pub use config::{ConfigError, DashboardConfig};

// Re-export infrastructure services
pub use logging::init_tracing;
pub use notifier::{ChannelNotifier, TracingNotifier};
pub use shutdown::ShutdownManager;
