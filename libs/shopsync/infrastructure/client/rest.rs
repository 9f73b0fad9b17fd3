//! REST client for the payments and orders services
//!
//! All requests go through the API gateway and carry the acting user in the
//! `X-User-ID` header.

use super::{ApiError, Result, ShopApi};
use crate::domain::{Account, Identity, Order, OrderDraft};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// Header carrying the acting user
pub const USER_HEADER: &str = "X-User-ID";

const ACCOUNTS_PATH: &str = "/api/payments/accounts";
const TOPUP_PATH: &str = "/api/payments/accounts/topup";
const ORDERS_PATH: &str = "/api/orders/orders";

/// HTTP implementation of [`ShopApi`]
pub struct RestClient {
    base_url: String,
    client: Client,
}

impl RestClient {
    /// Create a client for the gateway at `base_url`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get(&self, path: &str, identity: Identity) -> RequestBuilder {
        let url = self.url(path);
        debug!("GET {} as user {}", url, identity);
        self.client.get(url).header(USER_HEADER, identity.to_string())
    }

    fn post(&self, path: &str, identity: Identity) -> RequestBuilder {
        let url = self.url(path);
        debug!("POST {} as user {}", url, identity);
        self.client.post(url).header(USER_HEADER, identity.to_string())
    }

    /// Map non-2xx responses to [`ApiError::Rejected`]
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(ApiError::Rejected {
            status: status.as_u16(),
            body,
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        response
            .json()
            .await
            .map_err(|e| ApiError::DeserializeFailed(e.to_string()))
    }
}

#[async_trait]
impl ShopApi for RestClient {
    async fn get_account(&self, identity: Identity) -> Result<Option<Account>> {
        let response = self.get(ACCOUNTS_PATH, identity).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("No account for user {}", identity);
            return Ok(None);
        }

        let response = Self::check(response).await?;
        Self::decode(response).await.map(Some)
    }

    async fn create_account(&self, identity: Identity) -> Result<()> {
        let response = self
            .post(ACCOUNTS_PATH, identity)
            .json(&json!({}))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn topup(&self, identity: Identity, amount: f64) -> Result<()> {
        let response = self
            .post(TOPUP_PATH, identity)
            .json(&json!({ "amount": amount }))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn list_orders(&self, identity: Identity) -> Result<Vec<Order>> {
        let response = self.get(ORDERS_PATH, identity).send().await?;
        let response = Self::check(response).await?;
        let orders: Vec<Order> = Self::decode(response).await?;

        debug!("Fetched {} orders for user {}", orders.len(), identity);
        Ok(orders)
    }

    async fn create_order(&self, identity: Identity, draft: &OrderDraft) -> Result<Order> {
        let response = self.post(ORDERS_PATH, identity).json(draft).send().await?;
        let response = Self::check(response).await?;
        Self::decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = RestClient::new("http://localhost:8000/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(
            client.url(ACCOUNTS_PATH),
            "http://localhost:8000/api/payments/accounts"
        );
    }
}
