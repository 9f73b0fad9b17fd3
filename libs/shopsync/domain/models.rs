use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::num::NonZeroU64;

/// Opaque positive user identity
///
/// Fixed for the lifetime of a session; switching identity rebuilds the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct Identity(NonZeroU64);

impl Identity {
    /// Returns `None` for zero
    pub fn new(id: u64) -> Option<Self> {
        NonZeroU64::new(id).map(Self)
    }

    pub fn get(&self) -> u64 {
        self.0.get()
    }
}

impl TryFrom<u64> for Identity {
    type Error = String;

    fn try_from(id: u64) -> Result<Self, Self::Error> {
        Self::new(id).ok_or_else(|| "identity must be a positive integer".to_string())
    }
}

impl From<Identity> for u64 {
    fn from(identity: Identity) -> Self {
        identity.get()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Payment account of the current user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub balance: f64,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Order status as reported by the order service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    New,
    Finished,
    Cancelled,
}

impl OrderStatus {
    /// FINISHED and CANCELLED never change again
    pub fn is_terminal(&self) -> bool {
        !matches!(self, OrderStatus::New)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::New => "NEW",
            OrderStatus::Finished => "FINISHED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub amount: f64,
    #[serde(default)]
    pub description: Option<String>,
    pub status: OrderStatus,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of an order creation request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderDraft {
    pub amount: f64,
    pub description: Option<String>,
}

impl OrderDraft {
    pub fn new(amount: f64, description: impl Into<String>) -> Self {
        let description = description.into();
        Self {
            amount,
            description: if description.trim().is_empty() {
                None
            } else {
                Some(description)
            },
        }
    }
}

/// Per-section loading indicators
///
/// Both start raised and drop together once the first refresh completes,
/// whatever its outcome. They are never raised again for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadingFlags {
    pub account: bool,
    pub orders: bool,
}

impl LoadingFlags {
    pub fn settled() -> Self {
        Self {
            account: false,
            orders: false,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.account || self.orders
    }
}

impl Default for LoadingFlags {
    fn default() -> Self {
        Self {
            account: true,
            orders: true,
        }
    }
}

/// Immutable snapshot of everything the dashboard shows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShopState {
    pub account: Option<Account>,
    pub orders: Vec<Order>,
    pub loading: LoadingFlags,
}

impl ShopState {
    pub fn stats(&self) -> DashboardStats {
        DashboardStats::from_snapshot(self.account.as_ref(), &self.orders)
    }

    pub fn order(&self, id: i64) -> Option<&Order> {
        self.orders.iter().find(|order| order.id == id)
    }
}

/// Summary figures derived from a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DashboardStats {
    pub total_orders: usize,
    pub finished_orders: usize,
    /// Sum of FINISHED order amounts
    pub total_spent: f64,
    /// Current balance, 0 without an account
    pub balance: f64,
}

impl DashboardStats {
    pub fn from_snapshot(account: Option<&Account>, orders: &[Order]) -> Self {
        let finished = orders
            .iter()
            .filter(|order| order.status == OrderStatus::Finished);

        Self {
            total_orders: orders.len(),
            finished_orders: finished.clone().count(),
            total_spent: finished.map(|order| order.amount).sum(),
            balance: account.map(|a| a.balance).unwrap_or(0.0),
        }
    }
}

/// Accepts RFC 3339 as well as naive ISO 8601 (assumed UTC); anything else maps to `None`
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| parse_timestamp(&s)))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn order(id: i64, amount: f64, status: OrderStatus) -> Order {
        Order {
            id,
            user_id: Some(1),
            amount,
            description: None,
            status,
            created_at: None,
        }
    }

    #[test]
    fn test_identity_rejects_zero() {
        assert!(Identity::new(0).is_none());
        assert_eq!(Identity::new(42).unwrap().get(), 42);
        assert_eq!(Identity::new(42).unwrap().to_string(), "42");
        assert!(serde_json::from_value::<Identity>(json!(0)).is_err());
    }

    #[test]
    fn test_status_terminality() {
        assert!(!OrderStatus::New.is_terminal());
        assert!(OrderStatus::Finished.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_order_from_service_payload() {
        let order: Order = serde_json::from_value(json!({
            "id": 7,
            "user_id": 3,
            "amount": 150.5,
            "description": null,
            "status": "CANCELLED",
            "created_at": "2024-05-01T10:20:30.123456"
        }))
        .unwrap();

        assert_eq!(order.id, 7);
        assert_eq!(order.status, OrderStatus::Cancelled);
        assert_eq!(order.description, None);
        assert_eq!(
            order.created_at.unwrap().to_rfc3339(),
            "2024-05-01T10:20:30.123456+00:00"
        );
    }

    #[test]
    fn test_account_tolerates_missing_metadata() {
        let account: Account =
            serde_json::from_value(json!({"id": 1, "balance": 500.0, "created_at": "garbage"}))
                .unwrap();
        assert_eq!(account.balance, 500.0);
        assert_eq!(account.user_id, None);
        assert_eq!(account.created_at, None);
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let result = serde_json::from_value::<Order>(json!({
            "id": 1, "amount": 1.0, "status": "PENDING"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_draft_blank_description() {
        assert_eq!(OrderDraft::new(10.0, "  ").description, None);
        assert_eq!(
            OrderDraft::new(10.0, "Coffee").description.as_deref(),
            Some("Coffee")
        );
    }

    #[test]
    fn test_stats_count_only_finished_spend() {
        let account = Account {
            id: 1,
            user_id: None,
            balance: 700.0,
            created_at: None,
        };
        let orders = vec![
            order(1, 100.0, OrderStatus::Finished),
            order(2, 50.0, OrderStatus::Cancelled),
            order(3, 25.0, OrderStatus::New),
            order(4, 10.0, OrderStatus::Finished),
        ];

        let stats = DashboardStats::from_snapshot(Some(&account), &orders);
        assert_eq!(stats.total_orders, 4);
        assert_eq!(stats.finished_orders, 2);
        assert_eq!(stats.total_spent, 110.0);
        assert_eq!(stats.balance, 700.0);

        assert_eq!(DashboardStats::from_snapshot(None, &[]).balance, 0.0);
    }

    #[test]
    fn test_new_state_is_loading() {
        let state = ShopState::default();
        assert!(state.loading.is_loading());
        assert!(state.account.is_none());
        assert!(!LoadingFlags::settled().is_loading());
    }
}
