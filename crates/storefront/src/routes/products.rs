//! Catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
};
use serde::Deserialize;
use tracing::instrument;
use zoco_core::{Product, ProductFilter};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Featured products shown on the home page.
const DEFAULT_FEATURED: usize = 4;

/// Featured products query parameters.
#[derive(Debug, Deserialize)]
pub struct FeaturedQuery {
    pub limit: Option<usize>,
}

/// Product listing, optionally filtered.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    filter: std::result::Result<Query<ProductFilter>, QueryRejection>,
) -> Result<Json<Vec<Product>>> {
    let Query(filter) = filter?;
    Ok(Json(state.api().products().filter(&filter).await))
}

/// Featured products.
#[instrument(skip(state))]
pub async fn featured(
    State(state): State<AppState>,
    query: std::result::Result<Query<FeaturedQuery>, QueryRejection>,
) -> Result<Json<Vec<Product>>> {
    let Query(query) = query?;
    let limit = query.limit.unwrap_or(DEFAULT_FEATURED);
    Ok(Json(state.api().products().featured(limit).await))
}

/// Product detail by slug.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(slug): Path<String>) -> Result<Json<Product>> {
    state
        .api()
        .products()
        .get(&slug)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("product {slug}")))
}
