//! Payment gateway integration for checkout.
//!
//! The storefront registers an order with the gateway before the customer
//! pays, then verifies the signature the gateway hands back to the client.
//!
//! # Example
//!
//! ```rust,ignore
//! use shop_payment::{HmacGateway, PaymentGateway};
//!
//! let gateway = HmacGateway::new("key_id", "key_secret")?;
//! let order = gateway.create_order(&total, "receipt_42").await?;
//! gateway.verify_signature(&order.id, &payment_id, &signature)?;
//! ```

mod error;
mod gateway;

pub use error::PaymentError;
pub use gateway::{GatewayOrder, HmacGateway, PaymentGateway};
