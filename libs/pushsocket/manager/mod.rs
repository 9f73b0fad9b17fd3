//! Connection Manager
//!
//! Owns the single active connection of a session and its reconnect cycle.

#[allow(clippy::module_inception)]
pub mod manager;

pub use manager::ConnectionManager;
