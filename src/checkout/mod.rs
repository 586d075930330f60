//! Checkout Domain Module
//!
//! - Shipping-details validation (ordered rules, first failure wins)
//! - Order message formatting
//! - Checkout page state (payment selection, order completion)
//! - Notification sinks the order is handed to
//! - REST API handlers

pub mod flow;
pub mod handlers;
pub mod models;
pub mod sink;
pub mod summary;
pub mod validation;

pub use flow::{CheckoutError, CheckoutSession, OrderDraft, PaymentOutcome};
pub use handlers::routes;
pub use models::FulfillmentChoice;
pub use sink::{NotificationSink, RecordingSink, WhatsAppSink};
pub use validation::{validate, ShippingDetails, ValidationError};
