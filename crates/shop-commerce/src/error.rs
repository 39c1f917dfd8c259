//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in storefront domain operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommerceError {
    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Item not in cart.
    #[error("Cart item not present: {0}")]
    ItemNotInCart(String),

    /// Checkout attempted with an empty cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// A sized product was requested without a size.
    #[error("Size is required for product {0}")]
    SizeRequired(String),

    /// The requested size does not exist on the product.
    #[error("Selected size {size} not available for product {product_id}")]
    UnknownSize { product_id: String, size: String },

    /// Insufficient stock.
    #[error("Not enough stock for {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: String,
        size: Option<String>,
        requested: i64,
        available: i64,
    },

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Quantity exceeds maximum allowed.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(i64, i64),

    /// Per-user address limit reached.
    #[error("Address limit reached: at most {0} addresses per user")]
    AddressLimitReached(usize),

    /// Order has already been paid.
    #[error("Order already paid: {0}")]
    AlreadyPaid(String),

    /// Order is in a terminal status and cannot change.
    #[error("Order {order_id} is {status} and can no longer change")]
    TerminalOrderStatus { order_id: String, status: String },

    /// Unknown order status name.
    #[error("Invalid order status: {0}")]
    InvalidOrderStatus(String),

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Validation error.
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl CommerceError {
    /// Shorthand for a validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        CommerceError::ValidationError(message.into())
    }
}
