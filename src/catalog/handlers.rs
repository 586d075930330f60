//! REST API handlers for browsing the catalog

use super::models::{Product, SearchQuery};
use crate::cart::state::SharedState;
use crate::error::AppError;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};

/// Creates routes for catalog browsing
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/products", get(search_products))
        .route("/products/:id", get(get_product))
        .route("/categories", get(list_categories))
}

/// Endpoint: GET /products?q=&category=
async fn search_products(
    State(state): State<SharedState>,
    Query(query): Query<SearchQuery>,
) -> Json<Vec<Product>> {
    let results = state
        .catalog
        .search(query.q.as_deref().unwrap_or(""), query.category.as_deref())
        .into_iter()
        .cloned()
        .collect();
    Json(results)
}

/// Endpoint: GET /products/:id
async fn get_product(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, AppError> {
    state
        .catalog
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or(AppError::ProductNotFound(id))
}

/// Endpoint: GET /categories
async fn list_categories(State(state): State<SharedState>) -> Json<Vec<String>> {
    Json(state.catalog.categories().to_vec())
}
