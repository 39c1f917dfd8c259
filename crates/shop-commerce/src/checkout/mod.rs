//! Checkout module.
//!
//! Contains delivery addresses and orders.

mod address;
mod order;

pub use address::{check_address_limit, Address, AddressDraft, MAX_ADDRESSES_PER_USER};
pub use order::{
    AddressSnapshot, Order, OrderItem, OrderStatus, PaymentMethod, PaymentStatus,
};
