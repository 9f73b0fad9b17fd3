//! Router for the order push channel

use crate::domain::{classify, PushEvent};
use pushsocket::{MessageRouter, PushSocketError, WsMessage};

/// Keepalive frame understood by the order service
pub const PING_PAYLOAD: &str = r#"{"type":"ping"}"#;

/// Parses push frames into [`PushEvent`]s
pub struct ShopRouter;

impl ShopRouter {
    pub fn heartbeat_payload() -> WsMessage {
        WsMessage::from(PING_PAYLOAD)
    }
}

impl MessageRouter for ShopRouter {
    type Message = PushEvent;

    fn parse(&self, message: &WsMessage) -> pushsocket::Result<Self::Message> {
        let text = message
            .as_text()
            .ok_or_else(|| PushSocketError::ParseError("unexpected binary frame".to_string()))?;

        classify(text).map_err(|e| PushSocketError::ParseError(e.to_string()))
    }
}
