//! Notification sinks

use crate::domain::{Notification, NotificationKind, Notifier};
use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::{error, info, warn};

/// Writes every notification to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Success => info!("[Notify] ✅ {}", notification.message),
            NotificationKind::Info => info!("[Notify] {}", notification.message),
            NotificationKind::Error => error!("[Notify] ❌ {}", notification.message),
        }
    }
}

/// Hands notifications to a rendering thread
///
/// The receiving side is synchronous so it can live outside the runtime.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: Sender<Notification>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, Receiver<Notification>) {
        let (tx, rx) = unbounded();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        if self.tx.send(notification).is_err() {
            warn!("[Notify] Renderer gone, notification dropped");
        }
    }
}
