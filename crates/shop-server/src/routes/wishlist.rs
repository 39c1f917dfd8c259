//! `/api/shop/wishlist`: saved products.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::Router;
use serde::Deserialize;
use shop_commerce::prelude::*;

use crate::error::{ApiError, ApiResult};
use crate::extract::{CurrentUser, JsonBody};
use crate::response::ApiResponse;
use crate::state::{AppState, SharedState};

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/toggle", post(toggle_item))
        .route("/clear/:user_id", delete(clear_wishlist))
        .route("/:user_id", get(fetch_wishlist))
        .route("/:user_id/:product_id", delete(remove_item))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ToggleRequest {
    user_id: UserId,
    product_id: ProductId,
}

async fn load_wishlist(state: &AppState, user_id: &UserId) -> ApiResult<Wishlist> {
    Ok(state
        .wishlists
        .get(user_id.as_str())
        .await?
        .unwrap_or_else(|| Wishlist::new(user_id.clone())))
}

async fn fetch_wishlist(
    State(state): State<SharedState>,
    user: CurrentUser,
    Path(user_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let user_id = UserId::new(user_id);
    user.ensure_owner(&user_id)?;
    let _guard = state.user_locks.lock(&user_id).await;
    let mut wishlist = load_wishlist(&state, &user_id).await?;

    let mut live = Vec::with_capacity(wishlist.items.len());
    for item in &wishlist.items {
        live.push(state.products.get(item.product_id.as_str()).await?.is_some());
    }
    let mut alive = live.into_iter();
    if wishlist.retain_products(|_| alive.next().unwrap_or(false)) > 0 {
        state.wishlists.save(&wishlist).await?;
    }
    Ok(ApiResponse::ok(wishlist))
}

async fn toggle_item(
    State(state): State<SharedState>,
    user: CurrentUser,
    JsonBody(request): JsonBody<ToggleRequest>,
) -> ApiResult<impl IntoResponse> {
    user.ensure_owner(&request.user_id)?;
    let product = state
        .products
        .get(request.product_id.as_str())
        .await?
        .ok_or_else(|| ApiError::not_found("Product not found"))?;

    let _guard = state.user_locks.lock(&request.user_id).await;
    let mut wishlist = load_wishlist(&state, &request.user_id).await?;
    let added = wishlist.toggle(WishlistItem::from_product(&product));
    state.wishlists.save(&wishlist).await?;

    let message = if added {
        "Added to wishlist"
    } else {
        "Removed from wishlist"
    };
    Ok(ApiResponse::ok(wishlist).with_message(message))
}

async fn remove_item(
    State(state): State<SharedState>,
    user: CurrentUser,
    Path((user_id, product_id)): Path<(String, String)>,
) -> ApiResult<impl IntoResponse> {
    let (user_id, product_id) = (UserId::new(user_id), ProductId::new(product_id));
    user.ensure_owner(&user_id)?;
    let _guard = state.user_locks.lock(&user_id).await;
    let mut wishlist = load_wishlist(&state, &user_id).await?;
    if !wishlist.remove(&product_id) {
        return Err(ApiError::not_found("Product not in wishlist"));
    }
    state.wishlists.save(&wishlist).await?;
    Ok(ApiResponse::ok(wishlist).with_message("Removed from wishlist"))
}

async fn clear_wishlist(
    State(state): State<SharedState>,
    user: CurrentUser,
    Path(user_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let user_id = UserId::new(user_id);
    user.ensure_owner(&user_id)?;
    let _guard = state.user_locks.lock(&user_id).await;
    let mut wishlist = load_wishlist(&state, &user_id).await?;
    wishlist.clear();
    state.wishlists.save(&wishlist).await?;
    Ok(ApiResponse::ok(wishlist).with_message("Wishlist cleared"))
}
