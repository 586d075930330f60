//! Shopping Cart Helpers
//!
//! Session resolution for the REST handlers and small formatting helpers.

use super::models::CartItem;
use axum::http::{header, HeaderMap, HeaderValue};
use uuid::Uuid;

/// Cookie carrying the cart session id.
pub const SESSION_COOKIE: &str = "cart_session";

/// Creates a fresh session id.
pub fn new_session_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Reads the session id from the `Cookie` header, or mints a new one.
///
/// Returns `(session_id, is_new)`; callers set the cookie when `is_new`.
pub fn resolve_session_id(headers: &HeaderMap) -> (String, bool) {
    let existing = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && is_session_id(value))
        .map(|(_, value)| value.to_string());

    match existing {
        Some(id) => (id, false),
        None => (new_session_id(), true),
    }
}

fn is_session_id(value: &str) -> bool {
    !value.is_empty() && value.len() <= 64 && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// `Set-Cookie` value for a newly minted session.
pub fn session_cookie(session_id: &str) -> Option<HeaderValue> {
    HeaderValue::from_str(&format!("{}={}; Path=/; HttpOnly", SESSION_COOKIE, session_id)).ok()
}

/// Produces a human-readable one-line summary for a list of cart items.
///
/// Example output: `"2x Mongra Saffron, 1x Mamra Almonds"`.
pub fn format_item_summary(items: &[CartItem]) -> String {
    items
        .iter()
        .map(|i| format!("{}x {}", i.quantity, i.name))
        .collect::<Vec<_>>()
        .join(", ")
}
