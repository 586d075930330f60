//! REST API handlers for the checkout page

use super::flow::{CheckoutSession, OrderDraft, PaymentOutcome};
use super::models::*;
use super::validation::validate;
use crate::cart::{handlers::with_session, helpers::resolve_session_id, state::SharedState};
use crate::error::AppError;
use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};

/// Creates routes for checkout operations
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/checkout/validate", post(validate_shipping))
        .route("/checkout/payment", post(select_payment))
        .route("/checkout/complete", post(complete_order))
}

/// Endpoint: POST /checkout/validate
/// Reports the first problem with the shipping form, for the inline banner.
async fn validate_shipping(Json(payload): Json<ShippingInput>) -> Json<ValidationResponse> {
    let response = match validate(&payload.shipping) {
        Ok(()) => ValidationResponse {
            valid: true,
            error: None,
            field: None,
        },
        Err(e) => ValidationResponse {
            valid: false,
            error: Some(e.message()),
            field: Some(e.field()),
        },
    };
    Json(response)
}

/// Endpoint: POST /checkout/payment
/// UPI shows the payment code; card and cash-on-delivery validate and hand off.
async fn select_payment(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(payload): Json<PaymentInput>,
) -> Result<Response, AppError> {
    let (session_id, is_new) = resolve_session_id(&headers);

    let outcome = {
        let cart = state.read_cart(&session_id);
        let order = OrderDraft {
            store_name: &state.store_name,
            items: cart.items(),
            total: cart.total_price(),
        };
        let sink = state.sink.as_ref();
        if cart.is_live() {
            let mut checkout = state.checkout(&session_id);
            checkout.select_payment(payload.method, &payload.shipping, order, sink)?
        } else {
            // Nothing to remember for a session without a live cart.
            CheckoutSession::new().select_payment(payload.method, &payload.shipping, order, sink)?
        }
    };

    let response = match &outcome {
        PaymentOutcome::ShowPaymentCode => CheckoutResponse {
            status: outcome.status(),
            method: payload.method,
            payment_code: Some(state.upi_qr.clone()),
            handoff_url: None,
        },
        PaymentOutcome::HandedOff { message } => CheckoutResponse {
            status: outcome.status(),
            method: payload.method,
            payment_code: None,
            handoff_url: Some(state.whatsapp.link(message).to_string()),
        },
    };
    Ok(with_session(Json(response).into_response(), &session_id, is_new))
}

/// Endpoint: POST /checkout/complete
/// Validates, formats the order with the selected method and hands it off.
async fn complete_order(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(payload): Json<ShippingInput>,
) -> Result<Response, AppError> {
    let (session_id, is_new) = resolve_session_id(&headers);

    let (method, text) = {
        let cart = state.read_cart(&session_id);
        let checkout = state.checkout_state(&session_id);
        let order = OrderDraft {
            store_name: &state.store_name,
            items: cart.items(),
            total: cart.total_price(),
        };
        let text = checkout.complete_order(&payload.shipping, order, state.sink.as_ref())?;
        (checkout.selected(), text)
    };

    let response = CheckoutResponse {
        status: PaymentOutcome::HANDED_OFF,
        method,
        payment_code: None,
        handoff_url: Some(state.whatsapp.link(&text).to_string()),
    };
    Ok(with_session(Json(response).into_response(), &session_id, is_new))
}
