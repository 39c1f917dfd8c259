//! `/api/shop/search`: keyword search.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use shop_commerce::prelude::*;

use crate::error::{ApiError, ApiResult};
use crate::response::ApiResponse;
use crate::state::SharedState;

pub fn router() -> Router<SharedState> {
    Router::new().route("/:keyword", get(search_products))
}

async fn search_products(
    State(state): State<SharedState>,
    Path(keyword): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return Err(ApiError::bad_request(
            "Keyword is required and must be in string format",
        ));
    }
    let results = state
        .products
        .find(|p| keyword_matches(p, keyword))
        .await?;
    Ok(ApiResponse::ok(results))
}
