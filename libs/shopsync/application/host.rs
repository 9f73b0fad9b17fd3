//! Identity-switching host for dashboard sessions

use super::session::{Session, SessionSettings};
use crate::domain::{Identity, Notifier};
use crate::infrastructure::ShopApi;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

/// Owns at most one [`Session`] at a time
///
/// Switching identity fully tears the old session down (timers cancelled,
/// push connection closed) before the new one starts.
pub struct DashboardHost {
    api: Arc<dyn ShopApi>,
    notifier: Arc<dyn Notifier>,
    settings: SessionSettings,
    current: Mutex<Option<Arc<Session>>>,
}

impl DashboardHost {
    pub fn new(api: Arc<dyn ShopApi>, notifier: Arc<dyn Notifier>, settings: SessionSettings) -> Self {
        Self {
            api,
            notifier,
            settings,
            current: Mutex::new(None),
        }
    }

    /// Make `identity` the active one; a no-op if it already is
    pub async fn switch_identity(&self, identity: Identity) -> pushsocket::Result<Arc<Session>> {
        let mut current = self.current.lock().await;

        if let Some(session) = current.as_ref() {
            if session.identity() == identity {
                return Ok(Arc::clone(session));
            }
        }

        if let Some(previous) = current.take() {
            info!(
                "[Session] Switching from user {} to user {}",
                previous.identity(),
                identity
            );
            previous.teardown().await;
        }

        let session = Arc::new(Session::start(
            identity,
            Arc::clone(&self.api),
            Arc::clone(&self.notifier),
            &self.settings,
        )?);
        *current = Some(Arc::clone(&session));

        Ok(session)
    }

    /// Active session, if any
    pub async fn session(&self) -> Option<Arc<Session>> {
        self.current.lock().await.clone()
    }

    /// Manual reload of the active session; false when there is none
    pub async fn refresh(&self) -> bool {
        match self.session().await {
            Some(session) => {
                session.refresh().await;
                true
            }
            None => false,
        }
    }

    /// Tear down the active session
    pub async fn shutdown(&self) {
        let previous = self.current.lock().await.take();
        if let Some(session) = previous {
            session.teardown().await;
        }
    }
}
