//! Domain Layer
//!
//! Pure business entities and decisions.
//! This layer has no dependencies on infrastructure or application layers.

pub mod events;
pub mod models;
pub mod notification;

pub use events::{classify, OrderUpdate, ParseError, PushEvent};
pub use models::{
    Account, DashboardStats, Identity, LoadingFlags, Order, OrderDraft, OrderStatus, ShopState,
};
pub use notification::{Notification, NotificationKind, Notifier};
