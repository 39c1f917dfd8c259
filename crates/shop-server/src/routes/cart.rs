//! `/api/shop/cart`: the user's cart, priced and stocked from the catalog.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use axum::Router;
use serde::Deserialize;
use shop_commerce::prelude::*;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::extract::{CurrentUser, JsonBody};
use crate::response::ApiResponse;
use crate::state::{AppState, SharedState};

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/add", post(add_to_cart))
        .route("/get/:user_id", get(fetch_cart))
        .route("/update-cart", put(update_quantity))
        .route("/clear/:user_id", delete(clear_cart))
        .route("/:user_id/:product_id", delete(remove_item))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CartLineRequest {
    user_id: UserId,
    product_id: ProductId,
    #[serde(default)]
    quantity: i64,
    #[serde(default)]
    size: Option<String>,
}

impl CartLineRequest {
    fn size(&self) -> Option<&str> {
        self.size.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Default, Deserialize)]
struct SizeQuery {
    size: Option<String>,
}

async fn load_product(state: &AppState, id: &ProductId) -> ApiResult<Product> {
    state
        .products
        .get(id.as_str())
        .await?
        .ok_or_else(|| ApiError::not_found("Product not found"))
}

/// Drop lines whose product is gone and refresh the rest from the catalog.
async fn refresh_cart(state: &AppState, cart: &mut Cart) -> ApiResult<()> {
    let mut live = Vec::with_capacity(cart.items.len());
    for item in &cart.items {
        live.push(state.products.get(item.product_id.as_str()).await?);
    }

    let mut products = live.into_iter();
    let before = cart.items.len();
    cart.items.retain_mut(|item| match products.next().flatten() {
        Some(product) => {
            item.refresh_from(&product);
            true
        }
        None => false,
    });
    if cart.items.len() != before {
        debug!(
            user_id = %cart.user_id,
            dropped = before - cart.items.len(),
            "dropped deleted products from cart"
        );
    }
    Ok(())
}

async fn add_to_cart(
    State(state): State<SharedState>,
    user: CurrentUser,
    JsonBody(request): JsonBody<CartLineRequest>,
) -> ApiResult<impl IntoResponse> {
    user.ensure_owner(&request.user_id)?;
    let _guard = state.user_locks.lock(&request.user_id).await;
    if request.quantity <= 0 {
        return Err(CommerceError::InvalidQuantity(request.quantity).into());
    }

    let product = load_product(&state, &request.product_id).await?;
    let size = product.normalize_size(request.size())?;

    let mut cart = state
        .carts
        .get(request.user_id.as_str())
        .await?
        .unwrap_or_else(|| Cart::new(request.user_id.clone(), state.currency));

    let wanted = cart
        .quantity_of(&product.id, size.as_deref())
        .checked_add(request.quantity)
        .ok_or(CommerceError::Overflow)?;
    product.check_stock(size.as_deref(), wanted)?;

    let item = CartItem::from_product(&product, size.as_deref(), request.quantity)?;
    cart.add_item(item)?;
    state.carts.save(&cart).await?;
    Ok(ApiResponse::ok(cart).with_message("Item added to cart"))
}

async fn fetch_cart(
    State(state): State<SharedState>,
    user: CurrentUser,
    Path(user_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let user_id = UserId::new(user_id);
    user.ensure_owner(&user_id)?;
    let _guard = state.user_locks.lock(&user_id).await;
    let cart = match state.carts.get(user_id.as_str()).await? {
        Some(mut cart) => {
            refresh_cart(&state, &mut cart).await?;
            state.carts.save(&cart).await?;
            cart
        }
        None => Cart::new(user_id, state.currency),
    };
    Ok(ApiResponse::ok(cart))
}

async fn update_quantity(
    State(state): State<SharedState>,
    user: CurrentUser,
    JsonBody(request): JsonBody<CartLineRequest>,
) -> ApiResult<impl IntoResponse> {
    user.ensure_owner(&request.user_id)?;
    let _guard = state.user_locks.lock(&request.user_id).await;
    let mut cart = state
        .carts
        .get(request.user_id.as_str())
        .await?
        .ok_or_else(|| ApiError::not_found("Cart not found!"))?;

    let product = load_product(&state, &request.product_id).await?;
    let size = product.normalize_size(request.size())?;
    product.check_stock(size.as_deref(), request.quantity)?;

    cart.set_quantity(&product.id, size.as_deref(), request.quantity)?;
    state.carts.save(&cart).await?;
    Ok(ApiResponse::ok(cart).with_message("Cart updated"))
}

async fn remove_item(
    State(state): State<SharedState>,
    user: CurrentUser,
    Path((user_id, product_id)): Path<(String, String)>,
    Query(query): Query<SizeQuery>,
) -> ApiResult<impl IntoResponse> {
    let (user_id, product_id) = (UserId::new(user_id), ProductId::new(product_id));
    user.ensure_owner(&user_id)?;
    let _guard = state.user_locks.lock(&user_id).await;
    let mut cart = state
        .carts
        .get(user_id.as_str())
        .await?
        .ok_or_else(|| ApiError::not_found("Cart not found!"))?;

    let mut size = query.size.as_deref().map(str::trim).filter(|s| !s.is_empty());
    // Lines of unsized products carry no size.
    if let Some(product) = state.products.get(product_id.as_str()).await? {
        if !product.has_sizes() {
            size = None;
        }
    }
    if !cart.remove_product(&product_id, size) {
        return Err(CommerceError::ItemNotInCart(product_id.to_string()).into());
    }
    state.carts.save(&cart).await?;
    Ok(ApiResponse::ok(cart).with_message("Item removed from cart"))
}

async fn clear_cart(
    State(state): State<SharedState>,
    user: CurrentUser,
    Path(user_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let user_id = UserId::new(user_id);
    user.ensure_owner(&user_id)?;
    let _guard = state.user_locks.lock(&user_id).await;
    let cart = match state.carts.get(user_id.as_str()).await? {
        Some(mut cart) => {
            cart.clear();
            state.carts.save(&cart).await?;
            cart
        }
        None => Cart::new(user_id, state.currency),
    };
    Ok(ApiResponse::ok(cart).with_message("Cart cleared"))
}
