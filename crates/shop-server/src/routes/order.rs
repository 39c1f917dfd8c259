//! `/api/shop/order`: checkout, payment capture, order history.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use shop_commerce::prelude::*;

use crate::checkout::{self, CaptureRequest};
use crate::error::{ApiError, ApiResult};
use crate::extract::{CurrentUser, JsonBody};
use crate::response::ApiResponse;
use crate::routes::admin_orders::newest_first;
use crate::state::SharedState;

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/create", post(create_order))
        .route("/capture", post(capture_payment))
        .route("/verify-payment", post(capture_payment))
        .route("/list/:user_id", get(list_orders))
        .route("/details/:id", get(order_details))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateOrderRequest {
    user_id: UserId,
    address_id: AddressId,
    #[serde(default)]
    payment_method: Option<PaymentMethod>,
}

async fn create_order(
    State(state): State<SharedState>,
    user: CurrentUser,
    JsonBody(request): JsonBody<CreateOrderRequest>,
) -> ApiResult<impl IntoResponse> {
    user.ensure_owner(&request.user_id)?;
    let method = request.payment_method.unwrap_or_default();
    let (order, gateway_order) =
        checkout::place_order(&state, &request.user_id, &request.address_id, method).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Order created",
            "gatewayOrderId": gateway_order.id,
            "orderId": order.id,
            "amount": gateway_order.amount,
            "currency": gateway_order.currency,
            "keyId": state.gateway.key_id(),
            "data": order,
        })),
    ))
}

async fn capture_payment(
    State(state): State<SharedState>,
    CurrentUser(session): CurrentUser,
    JsonBody(request): JsonBody<CaptureRequest>,
) -> ApiResult<impl IntoResponse> {
    let order = checkout::capture_payment(&state, &session, &request).await?;
    Ok(ApiResponse::ok(order).with_message("Payment verified and order confirmed"))
}

async fn list_orders(
    State(state): State<SharedState>,
    user: CurrentUser,
    Path(user_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let user_id = UserId::new(user_id);
    user.ensure_owner(&user_id)?;
    let orders = state.orders.find(|o| o.user_id == user_id).await?;
    if orders.is_empty() {
        return Err(ApiError::not_found("No orders found!"));
    }
    Ok(ApiResponse::ok(newest_first(orders)))
}

async fn order_details(
    State(state): State<SharedState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let order = state
        .orders
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Order not found!"))?;
    user.ensure_owner(&order.user_id)?;
    Ok(ApiResponse::ok(order))
}
