//! Al-Noor Kesar Storefront Library
//!
//! This library provides the core functionality of the storefront service:
//! catalog browsing, a session-scoped shopping cart, and a checkout that hands
//! the order to WhatsApp instead of a payment processor.

// Domain modules
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod contact;

// Infrastructure
pub mod config;
pub mod error;
pub mod router;

use tracing_subscriber::EnvFilter;

/// Initialise the global `tracing` subscriber.
///
/// Respects `RUST_LOG`; falls back to `info,tower_http=debug`.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();
}
