//! Order types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::checkout::Address;
use crate::error::CommerceError;
use crate::ids::{AddressId, CartId, OrderId, ProductId, UserId};
use crate::money::Money;

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum OrderStatus {
    /// Order placed, awaiting payment.
    #[default]
    Pending,
    /// Payment captured.
    Confirmed,
    /// Order being prepared.
    InProcess,
    /// Order handed to the carrier.
    InShipping,
    /// Order delivered.
    Delivered,
    /// Order rejected by the store.
    Rejected,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::InProcess => "inProcess",
            OrderStatus::InShipping => "inShipping",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Rejected => "rejected",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::InProcess => "In Process",
            OrderStatus::InShipping => "In Shipping",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Rejected => "Rejected",
        }
    }

    /// Parse a wire name.
    pub fn parse(value: &str) -> Result<Self, CommerceError> {
        match value.trim() {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "inProcess" => Ok(OrderStatus::InProcess),
            "inShipping" => Ok(OrderStatus::InShipping),
            "delivered" => Ok(OrderStatus::Delivered),
            "rejected" => Ok(OrderStatus::Rejected),
            other => Err(CommerceError::InvalidOrderStatus(other.to_string())),
        }
    }

    /// Check if order is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Rejected)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "unpaid",
            PaymentStatus::Paid => "paid",
        }
    }
}

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Online payment through the payment gateway.
    #[default]
    #[serde(alias = "razorpay", alias = "gateway")]
    Online,
}

/// Copy of the delivery address taken when the order is placed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AddressSnapshot {
    pub address_id: AddressId,
    pub address: String,
    pub city: String,
    pub pincode: String,
    pub phone: String,
    pub notes: String,
}

impl From<&Address> for AddressSnapshot {
    fn from(address: &Address) -> Self {
        Self {
            address_id: address.id.clone(),
            address: address.address.clone(),
            city: address.city.clone(),
            pincode: address.pincode.clone(),
            phone: address.phone.clone(),
            notes: address.notes.clone(),
        }
    }
}

/// A line in an order, copied from the cart at checkout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub title: String,
    pub image: Option<String>,
    /// Unit price charged.
    pub price: Money,
    pub quantity: i64,
    pub size: Option<String>,
}

/// A placed order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    /// Cart the order was placed from.
    pub cart_id: CartId,
    pub cart_items: Vec<OrderItem>,
    pub address_info: AddressSnapshot,
    pub order_status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub total_amount: Money,
    /// Order id issued by the payment gateway.
    pub gateway_order_id: Option<String>,
    /// Payment id reported by the gateway at capture.
    pub payment_id: Option<String>,
    pub order_date: DateTime<Utc>,
    pub order_update_date: DateTime<Utc>,
}

impl Order {
    /// Snapshot a cart and address into a pending, unpaid order.
    pub fn from_cart(
        cart: &Cart,
        address: &Address,
        payment_method: PaymentMethod,
    ) -> Result<Self, CommerceError> {
        if cart.is_empty() {
            return Err(CommerceError::EmptyCart);
        }

        let cart_items = cart
            .items
            .iter()
            .map(|item| OrderItem {
                product_id: item.product_id.clone(),
                title: item.title.clone(),
                image: item.image.clone(),
                price: item.unit_price(),
                quantity: item.quantity,
                size: item.size.clone(),
            })
            .collect();

        let now = Utc::now();
        Ok(Self {
            id: OrderId::generate(),
            user_id: cart.user_id.clone(),
            cart_id: cart.id.clone(),
            cart_items,
            address_info: AddressSnapshot::from(address),
            order_status: OrderStatus::Pending,
            payment_method,
            payment_status: PaymentStatus::Unpaid,
            total_amount: cart.total()?,
            gateway_order_id: None,
            payment_id: None,
            order_date: now,
            order_update_date: now,
        })
    }

    /// Record the gateway order created for this order.
    pub fn attach_gateway_order(&mut self, gateway_order_id: impl Into<String>) {
        self.gateway_order_id = Some(gateway_order_id.into());
        self.order_update_date = Utc::now();
    }

    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }

    /// Record a captured payment: paid and confirmed.
    ///
    /// Orders already closed (delivered or rejected) cannot be paid.
    pub fn mark_paid(&mut self, payment_id: impl Into<String>) -> Result<(), CommerceError> {
        if self.is_paid() {
            return Err(CommerceError::AlreadyPaid(self.id.to_string()));
        }
        self.ensure_open()?;
        self.payment_status = PaymentStatus::Paid;
        self.order_status = OrderStatus::Confirmed;
        self.payment_id = Some(payment_id.into());
        self.order_update_date = Utc::now();
        Ok(())
    }

    /// Move the order to `status`. Terminal orders cannot change.
    pub fn update_status(&mut self, status: OrderStatus) -> Result<(), CommerceError> {
        self.ensure_open()?;
        self.order_status = status;
        self.order_update_date = Utc::now();
        Ok(())
    }

    /// Fail if the order is in a terminal status.
    pub fn ensure_open(&self) -> Result<(), CommerceError> {
        if self.order_status.is_terminal() {
            return Err(CommerceError::TerminalOrderStatus {
                order_id: self.id.to_string(),
                status: self.order_status.to_string(),
            });
        }
        Ok(())
    }

    /// Check if the order contains a product.
    pub fn contains_product(&self, product_id: &ProductId) -> bool {
        self.cart_items.iter().any(|i| &i.product_id == product_id)
    }
}
