//! Shopping Cart State Management
//!
//! This module manages the application state shared by every handler: the
//! per-session carts and checkout pages, the catalog, the cart storage and
//! the notification sink.
//!
//! A session only takes up memory once it changes something. Reads of a
//! session that is not live are served from a throwaway store rehydrated
//! from storage, and live sessions that stay idle for longer than
//! `session_idle` are dropped by a background sweeper. Their items are
//! already in storage, so the next request rehydrates them.

use super::storage::{session_key, CartStorage, MemoryStorage};
use super::store::CartStore;
use crate::catalog::Catalog;
use crate::checkout::flow::CheckoutSession;
use crate::checkout::sink::{NotificationSink, WhatsAppSink};
use crate::config::StorefrontConfig;
use dashmap::{
    mapref::one::{Ref, RefMut},
    DashMap,
};
use std::{
    ops::Deref,
    sync::{Arc, Weak},
    time::Duration,
};
use tokio::{task::JoinHandle, time::Instant};

// =============================================================================
// Application State
// =============================================================================

/// Shared application state that can be safely passed between threads
pub type SharedState = Arc<AppState>;

/// Core application state
pub struct AppState {
    /// Live carts keyed by session id. The entry guard serialises mutations
    /// of one cart.
    pub carts: DashMap<String, CartStore>,

    /// Checkout page state keyed by session id. Only sessions with a live
    /// cart have an entry.
    pub checkouts: DashMap<String, CheckoutSession>,

    /// When each live session was last used.
    pub last_seen: DashMap<String, Instant>,

    pub catalog: Arc<Catalog>,
    pub storage: Arc<dyn CartStorage>,
    pub sink: Arc<dyn NotificationSink>,

    /// Builds the deep links returned to the browser.
    pub whatsapp: WhatsAppSink,

    pub store_name: String,
    pub upi_qr: String,
    pub contact_delay: Duration,
    pub session_idle: Duration,
}

/// A session's cart for reading: the live store, or a throwaway copy
/// rehydrated from storage.
pub enum SessionCart<'a> {
    Live(Ref<'a, String, CartStore>),
    Transient(CartStore),
}

impl SessionCart<'_> {
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live(_))
    }
}

impl Deref for SessionCart<'_> {
    type Target = CartStore;

    fn deref(&self) -> &CartStore {
        match self {
            Self::Live(cart) => &**cart,
            Self::Transient(cart) => cart,
        }
    }
}

impl AppState {
    /// Creates state with in-memory carts and the WhatsApp sink.
    pub fn new(catalog: Catalog, config: &StorefrontConfig) -> Result<Self, url::ParseError> {
        let whatsapp = WhatsAppSink::new(&config.whatsapp_number)?;
        Ok(Self {
            carts: DashMap::new(),
            checkouts: DashMap::new(),
            last_seen: DashMap::new(),
            catalog: Arc::new(catalog),
            storage: Arc::new(MemoryStorage::new()),
            sink: Arc::new(whatsapp.clone()),
            whatsapp,
            store_name: config.store_name.clone(),
            upi_qr: config.upi_qr.clone(),
            contact_delay: config.contact_delay,
            session_idle: config.session_idle,
        })
    }

    pub fn with_storage(mut self, storage: Arc<dyn CartStorage>) -> Self {
        self.storage = storage;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.sink = sink;
        self
    }

    fn touch(&self, session_id: &str) {
        self.last_seen.insert(session_id.to_string(), Instant::now());
    }

    /// Returns the session's cart for mutation, making the session live.
    /// A cart seen for the first time is rehydrated from storage.
    pub fn cart(&self, session_id: &str) -> RefMut<'_, String, CartStore> {
        self.touch(session_id);
        if let Some(cart) = self.carts.get_mut(session_id) {
            return cart;
        }

        // Load outside the shard lock.
        let restored = CartStore::rehydrate(self.storage.clone(), session_key(session_id));
        self.carts
            .entry(session_id.to_string())
            .or_insert(restored)
    }

    /// Returns the session's cart for reading without making the session live.
    pub fn read_cart(&self, session_id: &str) -> SessionCart<'_> {
        match self.carts.get(session_id) {
            Some(cart) => {
                self.touch(session_id);
                SessionCart::Live(cart)
            }
            None => SessionCart::Transient(CartStore::rehydrate(
                self.storage.clone(),
                session_key(session_id),
            )),
        }
    }

    /// Returns the session's checkout page state for mutation.
    pub fn checkout(&self, session_id: &str) -> RefMut<'_, String, CheckoutSession> {
        self.touch(session_id);
        self.checkouts.entry(session_id.to_string()).or_default()
    }

    /// Copy of the session's checkout page state; the default when none is kept.
    pub fn checkout_state(&self, session_id: &str) -> CheckoutSession {
        self.checkouts
            .get(session_id)
            .map(|checkout| *checkout)
            .unwrap_or_default()
    }

    /// Drops carts and checkout state of sessions unused for `max_idle`.
    /// Returns how many sessions were dropped.
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        let now = Instant::now();
        let is_idle = |seen: &Instant| now.saturating_duration_since(*seen) >= max_idle;

        let stale: Vec<String> = self
            .last_seen
            .iter()
            .filter(|entry| is_idle(entry.value()))
            .map(|entry| entry.key().clone())
            .collect();

        let mut evicted = 0;
        for session_id in stale {
            // Skip sessions touched since the scan.
            if self
                .last_seen
                .remove_if(&session_id, |_, seen| is_idle(seen))
                .is_some()
            {
                self.carts.remove(&session_id);
                self.checkouts.remove(&session_id);
                evicted += 1;
            }
        }
        evicted
    }

    /// Periodically evicts idle sessions. The task ends once the state is dropped.
    pub fn spawn_session_sweeper(self: &Arc<Self>) -> JoinHandle<()> {
        let max_idle = self.session_idle;
        let period = (max_idle / 4).max(Duration::from_secs(1));
        let weak: Weak<Self> = Arc::downgrade(self);

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                let Some(state) = weak.upgrade() else {
                    break;
                };
                let evicted = state.evict_idle(max_idle);
                if evicted > 0 {
                    tracing::debug!(evicted, live = state.carts.len(), "evicted idle sessions");
                }
            }
        })
    }
}
