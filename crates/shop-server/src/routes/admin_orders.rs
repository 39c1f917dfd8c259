//! `/api/admin/orders`: order review and status changes.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, put};
use axum::Router;
use serde::Deserialize;
use shop_commerce::prelude::*;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::extract::{AdminUser, JsonBody};
use crate::response::ApiResponse;
use crate::state::SharedState;

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/get", get(list_orders))
        .route("/details/:id", get(order_details))
        .route("/update/:id", put(update_status))
        .route("/:user_id", get(orders_for_user))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusUpdate {
    #[serde(default)]
    order_status: String,
}

/// Newest first.
pub(crate) fn newest_first(mut orders: Vec<Order>) -> Vec<Order> {
    orders.sort_by(|a, b| b.order_date.cmp(&a.order_date));
    orders
}

async fn list_orders(
    State(state): State<SharedState>,
    _admin: AdminUser,
) -> ApiResult<impl IntoResponse> {
    let orders = state.orders.all().await?;
    if orders.is_empty() {
        return Err(ApiError::not_found("No orders found!"));
    }
    Ok(ApiResponse::ok(newest_first(orders)))
}

async fn order_details(
    State(state): State<SharedState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let order = state
        .orders
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Order not found!"))?;
    Ok(ApiResponse::ok(order))
}

async fn update_status(
    State(state): State<SharedState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    JsonBody(update): JsonBody<StatusUpdate>,
) -> ApiResult<impl IntoResponse> {
    let status = OrderStatus::parse(&update.order_status)?;
    let _inventory = state.inventory.lock().await;
    let mut order = state
        .orders
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Order not found!"))?;
    order.update_status(status)?;
    state.orders.save(&order).await?;
    info!(order_id = %order.id, status = status.as_str(), "order status updated");
    Ok(ApiResponse::ok(order).with_message("Order status is updated successfully!"))
}

async fn orders_for_user(
    State(state): State<SharedState>,
    _admin: AdminUser,
    Path(user_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let orders = state
        .orders
        .find(|o| o.user_id.as_str() == user_id)
        .await?;
    if orders.is_empty() {
        return Err(ApiError::not_found("No orders found!"));
    }
    Ok(ApiResponse::ok(newest_first(orders)))
}
