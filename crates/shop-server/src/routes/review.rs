//! `/api/shop/review`: product reviews from verified buyers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use shop_commerce::prelude::*;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::extract::{CurrentUser, JsonBody};
use crate::response::ApiResponse;
use crate::state::SharedState;

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/add", post(add_review))
        .route("/:product_id", get(product_reviews))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewReview {
    product_id: ProductId,
    user_id: UserId,
    #[serde(default)]
    user_name: String,
    #[serde(default)]
    review_message: String,
    #[serde(default)]
    review_value: i64,
}

/// Whether `order` proves the user bought `product_id`.
fn is_purchase_of(order: &Order, product_id: &ProductId) -> bool {
    order.is_paid()
        && order.order_status != OrderStatus::Rejected
        && order.contains_product(product_id)
}

async fn add_review(
    State(state): State<SharedState>,
    user: CurrentUser,
    JsonBody(request): JsonBody<NewReview>,
) -> ApiResult<impl IntoResponse> {
    user.ensure_owner(&request.user_id)?;

    let mut product = state
        .products
        .get(request.product_id.as_str())
        .await?
        .ok_or_else(|| ApiError::not_found("Product not found"))?;

    let purchased = state
        .orders
        .find_one(|o| o.user_id == request.user_id && is_purchase_of(o, &product.id))
        .await?
        .is_some();
    if !purchased {
        return Err(ApiError::forbidden(
            "You need to purchase product to review it.",
        ));
    }

    let user_name = if request.user_name.trim().is_empty() {
        user.0.user.user_name.clone()
    } else {
        request.user_name.trim().to_string()
    };
    let review = Review::new(
        product.id.clone(),
        request.user_id.clone(),
        user_name,
        request.review_message,
        request.review_value,
    )?;

    let _guard = state.review_writes.lock().await;
    let mut reviews = state
        .reviews
        .find(|r| r.product_id == product.id)
        .await?;
    if reviews.iter().any(|r| r.user_id == request.user_id) {
        return Err(ApiError::Conflict(
            "You already reviewed this product!".to_string(),
        ));
    }
    state.reviews.insert(&review).await?;
    reviews.push(review.clone());

    // The product document also carries stock, so re-read and save it
    // under the inventory lock.
    let inventory = state.inventory.lock().await;
    if let Some(latest) = state.products.get(product.id.as_str()).await? {
        product = latest;
    }
    product.average_review = average_rating(&reviews);
    state.products.save(&product).await?;
    drop(inventory);

    info!(
        product_id = %product.id,
        rating = review.review_value,
        average = product.average_review,
        "review added"
    );
    Ok((StatusCode::CREATED, ApiResponse::ok(review)))
}

async fn product_reviews(
    State(state): State<SharedState>,
    Path(product_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let product_id = ProductId::new(product_id);
    let reviews = state
        .reviews
        .find(|r| r.product_id == product_id)
        .await?;
    Ok(ApiResponse::ok(reviews))
}
