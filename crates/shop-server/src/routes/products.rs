//! `/api/shop/products`: catalog listing for customers.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use shop_commerce::prelude::*;

use crate::error::{ApiError, ApiResult};
use crate::response::ApiResponse;
use crate::state::SharedState;

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/get", get(filtered_products))
        .route("/get/:id", get(product_details))
}

/// `?category=a,b&brand=x&sortBy=price-hightolow`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListingQuery {
    category: Option<String>,
    brand: Option<String>,
    sort_by: Option<String>,
}

async fn filtered_products(
    State(state): State<SharedState>,
    Query(query): Query<ListingQuery>,
) -> ApiResult<impl IntoResponse> {
    let filter = ProductFilter::from_query(query.category.as_deref(), query.brand.as_deref());
    let mut products = filter.apply(state.products.all().await?);
    SortOption::parse(query.sort_by.as_deref()).sort(&mut products);
    Ok(ApiResponse::ok(products))
}

async fn product_details(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let product = state
        .products
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product not found!"))?;
    Ok(ApiResponse::ok(product))
}
