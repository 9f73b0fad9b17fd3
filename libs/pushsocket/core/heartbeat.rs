//! Keepalive ticks for open connections
//!
//! The heartbeat lives inside the connection loop's `select!`: each open
//! connection gets a fresh ticker, so no keepalive ever outlives its socket.

use crate::traits::WsMessage;
use std::time::Duration;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

pub(crate) struct Heartbeat {
    ticker: Option<(Interval, WsMessage)>,
}

impl Heartbeat {
    pub(crate) fn new(config: Option<&(Duration, WsMessage)>) -> Self {
        let ticker = config.map(|(interval, payload)| {
            // First tick one full interval after open, not immediately
            let mut ticker = interval_at(Instant::now() + *interval, *interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            (ticker, payload.clone())
        });
        Self { ticker }
    }

    /// Resolves with the payload to send on every tick; never resolves when disabled
    pub(crate) async fn tick(&mut self) -> WsMessage {
        match self.ticker.as_mut() {
            Some((ticker, payload)) => {
                ticker.tick().await;
                payload.clone()
            }
            None => std::future::pending().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_waits_one_interval() {
        let config = (Duration::from_secs(30), WsMessage::from("ping"));
        let mut heartbeat = Heartbeat::new(Some(&config));
        let start = Instant::now();

        let payload = heartbeat.tick().await;
        assert_eq!(payload, WsMessage::from("ping"));
        assert!(start.elapsed() >= Duration::from_secs(30));
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabled_heartbeat_never_ticks() {
        let mut heartbeat = Heartbeat::new(None);
        let result = tokio::time::timeout(Duration::from_secs(3600), heartbeat.tick()).await;
        assert!(result.is_err());
    }
}
