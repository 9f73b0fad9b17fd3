//! Push event classification
//!
//! Turns raw push payloads into typed events and decides, per event, whether
//! the user should be told and whether the snapshot must be reloaded.

use super::models::OrderStatus;
use super::notification::{Notification, SHORT_DURATION};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Payload is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("Payload is not a JSON object")]
    NotAnObject,

    #[error("Malformed order_update: {0}")]
    InvalidOrderUpdate(String),
}

/// Status change of one order
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderUpdate {
    pub order_id: i64,
    pub status: OrderStatus,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PushEvent {
    OrderUpdate(OrderUpdate),
    /// Greeting sent by the server right after the socket opens
    Welcome { message: Option<String> },
    /// Keepalive answer to our ping
    Pong,
    /// Well-formed payload of a type we do not act on; `None` when untyped
    Ignored { event_type: Option<String> },
}

impl PushEvent {
    /// Only order updates touch server-side state we display
    pub fn requires_refresh(&self) -> bool {
        matches!(self, PushEvent::OrderUpdate(_))
    }

    /// Notification for the user, if this event deserves one
    ///
    /// NEW orders are reported by the action that created them, so only
    /// terminal transitions are surfaced here.
    pub fn notification(&self) -> Option<Notification> {
        match self {
            PushEvent::OrderUpdate(update) if update.status != OrderStatus::New => Some(
                Notification::info(format!(
                    "Order #{} status updated: {}",
                    update.order_id, update.status
                ))
                .with_duration(SHORT_DURATION),
            ),
            _ => None,
        }
    }
}

/// Classify one raw push payload
pub fn classify(raw: &str) -> Result<PushEvent, ParseError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| ParseError::InvalidJson(e.to_string()))?;
    let object = value.as_object().ok_or(ParseError::NotAnObject)?;

    let Some(event_type) = object.get("type").and_then(Value::as_str) else {
        return Ok(PushEvent::Ignored { event_type: None });
    };

    match event_type {
        "order_update" => OrderUpdate::deserialize(&value)
            .map(PushEvent::OrderUpdate)
            .map_err(|e| ParseError::InvalidOrderUpdate(e.to_string())),
        "connection_established" => Ok(PushEvent::Welcome {
            message: object
                .get("message")
                .and_then(Value::as_str)
                .map(String::from),
        }),
        "pong" => Ok(PushEvent::Pong),
        other => Ok(PushEvent::Ignored {
            event_type: Some(other.to_string()),
        }),
    }
}
