//! REST API handlers for shopping cart operations
//!
//! Every endpoint answers with the session's [`CartView`].

use super::{helpers::*, models::*, state::SharedState};
use crate::error::AppError;
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};

/// Creates routes for cart-related operations
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/cart", get(get_cart).delete(clear_cart))
        .route("/cart/items", post(add_item))
        .route("/cart/items/:id", patch(update_quantity).delete(remove_item))
        .route("/cart/open", post(open_cart))
        .route("/cart/close", post(close_cart))
        .route("/cart/toggle", post(toggle_cart))
}

/// Attaches the session cookie to `response` when the session was just created.
pub(crate) fn with_session(mut response: Response, session_id: &str, is_new: bool) -> Response {
    if is_new {
        if let Some(cookie) = session_cookie(session_id) {
            response.headers_mut().insert(header::SET_COOKIE, cookie);
        }
    }
    response
}

/// Resolves the session, applies `f` to its cart and returns the resulting view.
fn respond_with_cart<F>(state: &SharedState, headers: &HeaderMap, f: F) -> Response
where
    F: FnOnce(&mut super::store::CartStore),
{
    let (session_id, is_new) = resolve_session_id(headers);
    let view = {
        let mut cart = state.cart(&session_id);
        f(&mut *cart);
        cart.view()
    };
    with_session(Json(view).into_response(), &session_id, is_new)
}

/// Endpoint: GET /cart
async fn get_cart(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let (session_id, is_new) = resolve_session_id(&headers);
    let view = state.read_cart(&session_id).view();
    with_session(Json(view).into_response(), &session_id, is_new)
}

/// Endpoint: POST /cart/items
/// Adds one unit of a catalog product at its effective price.
async fn add_item(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(payload): Json<AddToCartInput>,
) -> Result<Response, AppError> {
    let product = state
        .catalog
        .get(&payload.product_id)
        .ok_or_else(|| AppError::ProductNotFound(payload.product_id.clone()))?;
    let item = product.to_cart_item();

    tracing::debug!(product = %item.id, price = item.price, "adding to cart");
    Ok(respond_with_cart(&state, &headers, |cart| {
        cart.add_item(item);
        if payload.open_cart {
            cart.open_cart();
        }
    }))
}

/// Endpoint: PATCH /cart/items/:id
async fn update_quantity(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<UpdateQuantityInput>,
) -> Response {
    respond_with_cart(&state, &headers, |cart| {
        cart.update_quantity(&id, payload.quantity)
    })
}

/// Endpoint: DELETE /cart/items/:id
async fn remove_item(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    respond_with_cart(&state, &headers, |cart| cart.remove_item(&id))
}

/// Endpoint: DELETE /cart
async fn clear_cart(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    respond_with_cart(&state, &headers, |cart| cart.clear_cart())
}

/// Endpoint: POST /cart/open
async fn open_cart(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    respond_with_cart(&state, &headers, |cart| cart.open_cart())
}

/// Endpoint: POST /cart/close
async fn close_cart(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    respond_with_cart(&state, &headers, |cart| cart.close_cart())
}

/// Endpoint: POST /cart/toggle
async fn toggle_cart(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    respond_with_cart(&state, &headers, |cart| cart.toggle_cart())
}
