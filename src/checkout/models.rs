//! Checkout Domain Models

use super::validation::ShippingDetails;
use serde::{Deserialize, Serialize};

/// How the customer intends to pay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FulfillmentChoice {
    /// Scan the shop's UPI code, then share the payment screenshot
    #[default]
    Upi,
    Card,
    #[serde(rename = "cod", alias = "cashOnDelivery")]
    CashOnDelivery,
}

impl FulfillmentChoice {
    /// Label used in the order message.
    pub fn label(self) -> &'static str {
        match self {
            Self::Upi => "UPI Payment (Will share screenshot)",
            Self::Card => "Debit/Credit Card",
            Self::CashOnDelivery => "Cash on Delivery",
        }
    }

    /// Card and cash-on-delivery need full shipping details before hand-off.
    pub fn requires_shipping_details(self) -> bool {
        !matches!(self, Self::Upi)
    }
}

/// Input for `POST /checkout/validate` and `POST /checkout/complete`
#[derive(Debug, Default, Deserialize)]
pub struct ShippingInput {
    #[serde(default)]
    pub shipping: ShippingDetails,
}

/// Input for `POST /checkout/payment`
#[derive(Debug, Deserialize)]
pub struct PaymentInput {
    pub method: FulfillmentChoice,
    #[serde(default)]
    pub shipping: ShippingDetails,
}

/// Inline validation banner state
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
}

/// Result of choosing a payment method or completing the order
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    /// `show_payment_code` or `handed_off`
    pub status: &'static str,
    pub method: FulfillmentChoice,

    /// Image of the shop's UPI code, when it should be displayed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_code: Option<String>,

    /// Deep link the browser opens to continue in the chat app
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handoff_url: Option<String>,
}
