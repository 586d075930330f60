//! Catalog Domain Models

use crate::cart::models::NewCartItem;
use serde::{Deserialize, Serialize};

/// Category value that matches every product.
pub const ALL_CATEGORIES: &str = "All";

/// A product record as listed in `products.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,

    /// List price in whole rupees
    pub price: u32,

    /// Sale price, shown struck-through against `price`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_price: Option<u32>,

    pub image: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub category: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews: Option<u32>,

    /// Marketing tag such as "Best Seller"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
}

impl Product {
    /// The price a cart line is charged at. A zero discount counts as no discount.
    pub fn effective_price(&self) -> u32 {
        match self.discount_price {
            Some(discount) if discount > 0 => discount,
            _ => self.price,
        }
    }

    /// The cart-facing view of this product.
    pub fn to_cart_item(&self) -> NewCartItem {
        NewCartItem {
            id: self.id.clone(),
            name: self.name.clone(),
            price: self.effective_price(),
            image: self.image.clone(),
            weight: self.weight.clone(),
        }
    }

    pub(crate) fn matches_query(&self, needle_lower: &str) -> bool {
        if needle_lower.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(needle_lower)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(needle_lower))
    }

    pub(crate) fn in_category(&self, category: Option<&str>) -> bool {
        match category {
            None => true,
            Some(c) if c.is_empty() || c == ALL_CATEGORIES => true,
            Some(c) => self.category == c,
        }
    }
}

/// The on-disk catalog document
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CatalogFile {
    pub products: Vec<Product>,
    #[serde(default)]
    pub categories: Vec<String>,
}

/// Query string for `GET /products`
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}
