//! Shopping Cart Domain Models
//!
//! This module contains all data structures related to the shopping cart
//! business domain.

use serde::{Deserialize, Serialize};

// =============================================================================
// Cart Domain Models
// =============================================================================

/// Returns the default quantity (1) for cart items
fn default_quantity() -> u32 {
    1
}

/// A line in the shopping cart
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Catalog identifier, unique within a cart
    pub id: String,

    /// Display name of the product
    pub name: String,

    /// Effective unit price in whole rupees
    pub price: u32,

    /// Product image reference
    pub image: String,

    /// Size/weight label, e.g. "1g"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,

    /// Quantity of this item (defaults to 1)
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

impl CartItem {
    /// `price * quantity` for this line.
    pub fn subtotal(&self) -> u64 {
        u64::from(self.price) * u64::from(self.quantity)
    }
}

/// A product as handed to [`CartStore::add_item`](super::store::CartStore::add_item),
/// before it has a quantity.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewCartItem {
    pub id: String,
    pub name: String,
    pub price: u32,
    pub image: String,
    #[serde(default)]
    pub weight: Option<String>,
}

impl NewCartItem {
    pub(crate) fn into_line(self) -> CartItem {
        CartItem {
            id: self.id,
            name: self.name,
            price: self.price,
            image: self.image,
            weight: self.weight,
            quantity: 1,
        }
    }
}

/// Persisted form of a cart. `is_open` is deliberately absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartSnapshot {
    pub items: Vec<CartItem>,
}

// =============================================================================
// REST Inputs / Responses
// =============================================================================

/// Input for `POST /cart/items`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartInput {
    /// Catalog identifier of the product to add
    pub product_id: String,

    /// Also open the cart panel (the product cards do this)
    #[serde(default)]
    pub open_cart: bool,
}

/// Input for `PATCH /cart/items/:id`
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityInput {
    /// New quantity; zero or below removes the line
    pub quantity: i64,
}

/// Read-only view of a cart returned by every cart endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub total_items: u64,
    pub total_price: u64,
    pub is_open: bool,
}
