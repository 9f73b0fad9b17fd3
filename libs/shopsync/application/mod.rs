//! Application Layer
//!
//! Orchestrates the domain and infrastructure layers into live sessions.

pub mod host;
pub mod session;
pub mod store;

pub use host::DashboardHost;
pub use session::{Session, SessionSettings};
pub use store::StateStore;
