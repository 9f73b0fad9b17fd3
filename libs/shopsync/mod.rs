//! Shop Dashboard Synchronization Core
//!
//! Keeps a local view of one user's account and order history consistent
//! with the remote shop services, using a pull channel (REST) and a push
//! channel (WebSocket).
//!
//! ## Architecture
//!
//! - **domain**: models, push event classification, notification intents
//! - **infrastructure**: REST client, push router, config, logging, notifier sinks
//! - **application**: `StateStore`, `Session` and `DashboardHost`

pub mod application;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used items
pub use application::{DashboardHost, Session, SessionSettings, StateStore};

pub use domain::{
    classify, Account, DashboardStats, Identity, LoadingFlags, Notification, NotificationKind,
    Notifier, Order, OrderDraft, OrderStatus, OrderUpdate, ParseError, PushEvent, ShopState,
};

pub use infrastructure::{
    init_tracing, ApiError, ChannelNotifier, ConfigError, DashboardConfig, RestClient,
    ShopApi, ShopRouter, ShutdownManager, TracingNotifier,
};
