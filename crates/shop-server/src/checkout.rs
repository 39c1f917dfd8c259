//! Order placement and payment capture.
//!
//! Stock is checked when an order is placed and again, under the inventory
//! lock, when its payment is captured. Capture checks every line before
//! any stock is written. No lock is held while the gateway is called.

use std::collections::HashMap;

use serde::Deserialize;
use shop_auth::AuthSession;
use shop_commerce::prelude::*;
use shop_payment::GatewayOrder;
use tracing::{info, warn};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Capture request sent by the checkout client after paying.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureRequest {
    #[serde(default, alias = "razorpay_order_id")]
    pub gateway_order_id: String,
    #[serde(default, alias = "razorpay_payment_id")]
    pub payment_id: String,
    #[serde(default, alias = "razorpay_signature")]
    pub signature: String,
    #[serde(default)]
    pub order_id: String,
}

impl CaptureRequest {
    fn validate(&self) -> ApiResult<()> {
        let missing = [
            &self.gateway_order_id,
            &self.payment_id,
            &self.signature,
            &self.order_id,
        ]
        .iter()
        .any(|v| v.trim().is_empty());
        if missing {
            return Err(ApiError::bad_request("Missing payment details"));
        }
        Ok(())
    }
}

/// Refresh the user's cart from the catalog, check stock for every line,
/// and open a pending order with a gateway order attached.
pub async fn place_order(
    state: &AppState,
    user_id: &UserId,
    address_id: &AddressId,
    method: PaymentMethod,
) -> ApiResult<(Order, GatewayOrder)> {
    let user_lock = state.user_locks.lock(user_id).await;
    let mut cart = state
        .carts
        .get(user_id.as_str())
        .await?
        .filter(|c| !c.is_empty())
        .ok_or(CommerceError::EmptyCart)?;

    let address = state
        .addresses
        .get(address_id.as_str())
        .await?
        .filter(|a| &a.user_id == user_id)
        .ok_or_else(|| ApiError::not_found("Address not found"))?;

    for item in &mut cart.items {
        let product = state
            .products
            .get(item.product_id.as_str())
            .await?
            .ok_or_else(|| CommerceError::ProductNotFound(item.title.clone()))?;
        product.check_stock(item.size.as_deref(), item.quantity)?;
        item.refresh_from(&product);
    }
    state.carts.save(&cart).await?;
    let mut order = Order::from_cart(&cart, &address, method)?;
    drop(user_lock);

    let gateway_order = state
        .gateway
        .create_order(&order.total_amount, &format!("receipt_{}", order.id))
        .await?;
    order.attach_gateway_order(gateway_order.id.clone());
    state.orders.insert(&order).await?;

    info!(
        order_id = %order.id,
        user_id = %user_id,
        amount = order.total_amount.amount,
        gateway_order_id = %gateway_order.id,
        "order created"
    );
    Ok((order, gateway_order))
}

/// Verify a payment, take its stock, and confirm the order.
pub async fn capture_payment(
    state: &AppState,
    caller: &AuthSession,
    request: &CaptureRequest,
) -> ApiResult<Order> {
    request.validate()?;
    state.gateway.verify_signature(
        &request.gateway_order_id,
        &request.payment_id,
        &request.signature,
    )?;

    let _inventory = state.inventory.lock().await;

    let mut order = state
        .orders
        .get(&request.order_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Order not found"))?;
    if !caller.can_access(&order.user_id) {
        return Err(ApiError::forbidden("You can only access your own data"));
    }
    if order.gateway_order_id.as_deref() != Some(request.gateway_order_id.as_str()) {
        warn!(order_id = %order.id, "payment presented for a different gateway order");
        return Err(ApiError::bad_request("Payment does not belong to this order"));
    }
    if order.is_paid() {
        return Err(CommerceError::AlreadyPaid(order.id.to_string()).into());
    }
    order.ensure_open()?;

    // Apply every line to in-memory copies first so nothing is written
    // unless the whole order can be filled.
    let mut products: HashMap<ProductId, Product> = HashMap::new();
    for item in &order.cart_items {
        if !products.contains_key(&item.product_id) {
            let product = state
                .products
                .get(item.product_id.as_str())
                .await?
                .ok_or_else(|| CommerceError::ProductNotFound(item.title.clone()))?;
            products.insert(item.product_id.clone(), product);
        }
        let Some(product) = products.get_mut(&item.product_id) else {
            continue;
        };
        product.check_stock(item.size.as_deref(), item.quantity)?;
        product.decrement_stock(item.size.as_deref(), item.quantity)?;
    }

    order.mark_paid(request.payment_id.clone())?;
    for product in products.values() {
        state.products.save(product).await?;
    }
    state.orders.save(&order).await?;

    let _user_lock = state.user_locks.lock(&order.user_id).await;
    state.carts.delete(order.user_id.as_str()).await?;

    info!(
        order_id = %order.id,
        payment_id = %request.payment_id,
        "payment captured"
    );
    Ok(order)
}
