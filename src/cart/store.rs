//! The cart store
//!
//! [`CartStore`] owns one session's cart: its ordered line items and whether
//! the cart panel is open. Line items are the only persisted part; every
//! change to them writes a full snapshot through the injected
//! [`CartStorage`]. Totals are computed on read.

use super::models::{CartItem, CartSnapshot, CartView, NewCartItem};
use super::storage::CartStorage;
use std::{fmt, sync::Arc};

pub struct CartStore {
    items: Vec<CartItem>,
    is_open: bool,
    storage: Arc<dyn CartStorage>,
    key: String,
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("key", &self.key)
            .field("items", &self.items)
            .field("is_open", &self.is_open)
            .finish()
    }
}

impl CartStore {
    /// Restores the cart saved under `key`, or starts empty.
    ///
    /// A snapshot that cannot be read is treated as absent: the session simply
    /// starts with an empty cart.
    pub fn rehydrate(storage: Arc<dyn CartStorage>, key: impl Into<String>) -> Self {
        let key = key.into();
        let items = match storage.load(&key) {
            Ok(Some(snapshot)) => {
                tracing::debug!(key = %key, lines = snapshot.items.len(), "rehydrated cart");
                snapshot.items
            }
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "discarding unreadable cart snapshot");
                Vec::new()
            }
        };

        Self {
            items,
            is_open: false,
            storage,
            key,
        }
    }

    /// Adds one unit of `item`. A product already in the cart has its quantity
    /// bumped instead of getting a second line.
    pub fn add_item(&mut self, item: NewCartItem) {
        if let Some(existing) = self.items.iter_mut().find(|i| i.id == item.id) {
            existing.quantity = existing.quantity.saturating_add(1);
        } else {
            self.items.push(item.into_line());
        }
        self.persist();
    }

    /// Removes the line for `id`. Unknown ids are ignored.
    pub fn remove_item(&mut self, id: &str) {
        let before = self.items.len();
        self.items.retain(|i| i.id != id);
        if self.items.len() != before {
            self.persist();
        }
    }

    /// Sets the quantity of `id`. Zero or negative removes the line.
    pub fn update_quantity(&mut self, id: &str, new_quantity: i64) {
        if new_quantity <= 0 {
            self.remove_item(id);
            return;
        }

        let quantity = u32::try_from(new_quantity).unwrap_or(u32::MAX);
        if let Some(line) = self.items.iter_mut().find(|i| i.id == id) {
            if line.quantity != quantity {
                line.quantity = quantity;
                self.persist();
            }
        }
    }

    pub fn clear_cart(&mut self) {
        self.items.clear();
        self.persist();
    }

    /// Sum of quantities, not the number of lines.
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    pub fn total_price(&self) -> u64 {
        self.items.iter().map(CartItem::subtotal).sum()
    }

    pub fn open_cart(&mut self) {
        self.is_open = true;
    }

    pub fn close_cart(&mut self) {
        self.is_open = false;
    }

    pub fn toggle_cart(&mut self) {
        self.is_open = !self.is_open;
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn view(&self) -> CartView {
        CartView {
            items: self.items.clone(),
            total_items: self.total_items(),
            total_price: self.total_price(),
            is_open: self.is_open,
        }
    }

    /// Best effort: a failed write leaves the in-memory cart as it is.
    fn persist(&self) {
        let snapshot = CartSnapshot {
            items: self.items.clone(),
        };
        if let Err(e) = self.storage.save(&self.key, &snapshot) {
            tracing::warn!(key = %self.key, error = %e, "failed to persist cart");
        }
    }
}
