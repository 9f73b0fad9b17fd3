//! Clients for the shop services
//!
//! - `rest`: pull channel (accounts and orders over HTTP)
//! - `push`: router for the order push channel

pub mod push;
pub mod rest;

use crate::domain::{Account, Identity, Order, OrderDraft};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Request rejected ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Deserialization failed: {0}")]
    DeserializeFailed(String),
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// Pull channel of the shop backend
///
/// Every call is made on behalf of `identity`.
#[async_trait]
pub trait ShopApi: Send + Sync {
    /// `Ok(None)` when the user has no account yet
    async fn get_account(&self, identity: Identity) -> Result<Option<Account>>;

    async fn create_account(&self, identity: Identity) -> Result<()>;

    async fn topup(&self, identity: Identity, amount: f64) -> Result<()>;

    async fn list_orders(&self, identity: Identity) -> Result<Vec<Order>>;

    async fn create_order(&self, identity: Identity, draft: &OrderDraft) -> Result<Order>;
}
