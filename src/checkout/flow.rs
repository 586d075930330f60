//! Checkout page state
//!
//! Tracks which payment method is selected and whether the UPI payment code
//! is showing. UPI never needs shipping details up front; card and
//! cash-on-delivery hand the order to the sink only once the details pass
//! validation.

use super::models::FulfillmentChoice;
use super::sink::NotificationSink;
use super::summary::format_order_summary;
use super::validation::{validate, ShippingDetails, ValidationError};
use crate::cart::{helpers::format_item_summary, models::CartItem};

/// What the cart looks like at checkout time.
#[derive(Debug, Clone, Copy)]
pub struct OrderDraft<'a> {
    pub store_name: &'a str,
    pub items: &'a [CartItem],
    pub total: u64,
}

impl OrderDraft<'_> {
    fn summary(&self, details: &ShippingDetails, choice: FulfillmentChoice) -> String {
        format_order_summary(self.store_name, self.items, self.total, details, choice)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// Show the shop's UPI code.
    ShowPaymentCode,
    /// The order message went to the sink.
    HandedOff { message: String },
}

impl PaymentOutcome {
    pub const SHOW_PAYMENT_CODE: &'static str = "show_payment_code";
    pub const HANDED_OFF: &'static str = "handed_off";

    pub fn status(&self) -> &'static str {
        match self {
            Self::ShowPaymentCode => Self::SHOW_PAYMENT_CODE,
            Self::HandedOff { .. } => Self::HANDED_OFF,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CheckoutError {
    #[error("Your cart is empty")]
    EmptyCart,

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckoutSession {
    selected: FulfillmentChoice,
    show_payment_code: bool,
}

impl CheckoutSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> FulfillmentChoice {
        self.selected
    }

    pub fn shows_payment_code(&self) -> bool {
        self.selected == FulfillmentChoice::Upi && self.show_payment_code
    }

    /// The inline banner: the first problem with `details`, if any.
    pub fn validation_status(details: &ShippingDetails) -> Option<ValidationError> {
        validate(details).err()
    }

    /// Reacts to a click on one of the payment options.
    ///
    /// Only UPI changes the selection; card and cash-on-delivery send the
    /// order straight to the sink and leave the page as it was.
    pub fn select_payment(
        &mut self,
        choice: FulfillmentChoice,
        details: &ShippingDetails,
        order: OrderDraft<'_>,
        sink: &dyn NotificationSink,
    ) -> Result<PaymentOutcome, CheckoutError> {
        if !choice.requires_shipping_details() {
            self.selected = choice;
            self.show_payment_code = true;
            return Ok(PaymentOutcome::ShowPaymentCode);
        }

        if order.items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        validate(details)?;

        let message = order.summary(details, choice);
        sink.send(&message);
        tracing::info!(
            method = ?choice,
            items = %format_item_summary(order.items),
            total = order.total,
            "order handed off"
        );
        Ok(PaymentOutcome::HandedOff { message })
    }

    /// "Complete order": validates regardless of method and sends the order
    /// with the currently selected method. Returns the message that was sent.
    pub fn complete_order(
        &self,
        details: &ShippingDetails,
        order: OrderDraft<'_>,
        sink: &dyn NotificationSink,
    ) -> Result<String, CheckoutError> {
        if order.items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        validate(details)?;

        let text = order.summary(details, self.selected);
        sink.send(&text);
        tracing::info!(
            method = ?self.selected,
            items = %format_item_summary(order.items),
            total = order.total,
            "order completed"
        );
        Ok(text)
    }
}
