//! Authoritative local snapshot of one user's account and orders
//!
//! Every path that changes what the dashboard shows (initial load, user
//! actions, push-driven reloads, manual refresh) ends in [`StateStore::refresh`],
//! which replaces account and orders together in a single write.

use crate::domain::{
    Account, DashboardStats, Identity, LoadingFlags, Notification, Notifier, Order, OrderDraft,
    ShopState,
};
use crate::infrastructure::ShopApi;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

struct Inner {
    snapshot: ShopState,
    /// Sequence number of the refresh that produced `snapshot`
    applied_seq: u64,
}

pub struct StateStore {
    identity: Identity,
    api: Arc<dyn ShopApi>,
    notifier: Arc<dyn Notifier>,
    order_refresh_delay: Duration,
    inner: RwLock<Inner>,
    next_seq: AtomicU64,
    revision: watch::Sender<u64>,
    cancel: CancellationToken,
}

impl StateStore {
    /// Create a store in the loading state
    ///
    /// `cancel` stops timers the store schedules (the delayed order refresh).
    pub fn new(
        identity: Identity,
        api: Arc<dyn ShopApi>,
        notifier: Arc<dyn Notifier>,
        order_refresh_delay: Duration,
        cancel: CancellationToken,
    ) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            identity,
            api,
            notifier,
            order_refresh_delay,
            inner: RwLock::new(Inner {
                snapshot: ShopState::default(),
                applied_seq: 0,
            }),
            next_seq: AtomicU64::new(0),
            revision,
            cancel,
        }
    }

    pub fn identity(&self) -> Identity {
        self.identity
    }

    pub fn snapshot(&self) -> ShopState {
        self.inner.read().snapshot.clone()
    }

    pub fn stats(&self) -> DashboardStats {
        self.inner.read().snapshot.stats()
    }

    pub fn loading(&self) -> LoadingFlags {
        self.inner.read().snapshot.loading
    }

    /// Number of snapshots applied so far
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// Watch the revision counter; it bumps after every applied refresh
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Reload account and orders and apply them together
    ///
    /// Both fetches run concurrently and never fail: a missing or unreachable
    /// account becomes `None`, a failed order listing becomes empty. Safe to
    /// call concurrently; a completion older than the applied snapshot is
    /// discarded. Returns whether this call's result was applied.
    pub async fn refresh(&self) -> bool {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("[Store] Refresh #{} for user {} started", seq, self.identity);

        let (account, orders) = tokio::join!(self.fetch_account(), self.fetch_orders());

        {
            let mut inner = self.inner.write();
            if seq < inner.applied_seq {
                debug!(
                    "[Store] Refresh #{} superseded by #{}, discarding",
                    seq, inner.applied_seq
                );
                return false;
            }

            inner.applied_seq = seq;
            inner.snapshot = ShopState {
                account,
                orders,
                loading: LoadingFlags::settled(),
            };
        }

        self.revision.send_modify(|revision| *revision += 1);
        debug!("[Store] Refresh #{} applied", seq);
        true
    }

    async fn fetch_account(&self) -> Option<Account> {
        match self.api.get_account(self.identity).await {
            Ok(account) => account,
            Err(e) => {
                warn!("[Store] Account fetch failed: {}", e);
                None
            }
        }
    }

    async fn fetch_orders(&self) -> Vec<Order> {
        match self.api.list_orders(self.identity).await {
            Ok(orders) => orders,
            Err(e) => {
                warn!("[Store] Order list fetch failed: {}", e);
                Vec::new()
            }
        }
    }

    /// Open an account for the current user; returns whether the server accepted it
    pub async fn create_account(&self) -> bool {
        match self.api.create_account(self.identity).await {
            Ok(()) => {
                info!("[Store] Account created for user {}", self.identity);
                self.refresh().await;
                self.notifier
                    .notify(Notification::success("Account created successfully!"));
                true
            }
            Err(e) => {
                warn!("[Store] Account creation failed: {}", e);
                self.notifier.notify(Notification::error(
                    "Could not create account. It may already exist.",
                ));
                false
            }
        }
    }

    /// Add `amount` to the balance; the server validates the sign
    pub async fn topup(&self, amount: f64) -> bool {
        if !amount.is_finite() {
            warn!("[Store] Rejecting non-finite top-up amount {}", amount);
            self.notifier
                .notify(Notification::error("Top-up amount must be a number"));
            return false;
        }

        match self.api.topup(self.identity, amount).await {
            Ok(()) => {
                info!("[Store] Topped up {} for user {}", amount, self.identity);
                self.refresh().await;
                self.notifier
                    .notify(Notification::success(format!("Balance topped up by {}", amount)));
                true
            }
            Err(e) => {
                warn!("[Store] Top-up failed: {}", e);
                self.notifier
                    .notify(Notification::error("Failed to top up the account"));
                false
            }
        }
    }

    /// Place an order; the list is reloaded after the configured delay
    ///
    /// Payment happens asynchronously on the server, so the refresh is
    /// deferred rather than immediate.
    pub async fn create_order(self: &Arc<Self>, draft: OrderDraft) -> bool {
        match self.api.create_order(self.identity, &draft).await {
            Ok(order) => {
                info!("[Store] Order #{} placed for user {}", order.id, self.identity);
                self.notifier.notify(Notification::success(
                    "Order placed! Awaiting processing...",
                ));
                self.schedule_refresh(self.order_refresh_delay);
                true
            }
            Err(e) => {
                warn!("[Store] Order creation failed: {}", e);
                self.notifier.notify(Notification::error(
                    "Could not create the order. Check the details.",
                ));
                false
            }
        }
    }

    fn schedule_refresh(self: &Arc<Self>, delay: Duration) {
        let store = Arc::clone(self);
        let cancel = self.cancel.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("[Store] Delayed refresh cancelled");
                }
                _ = tokio::time::sleep(delay) => {
                    store.refresh().await;
                }
            }
        });
    }

    /// Cancel timers scheduled by this store
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}
