//! Storefront domain types and rules.
//!
//! This crate holds everything about the shop that does not touch I/O:
//!
//! - **Catalog**: Products with optional per-size stock and price overrides, banner images
//! - **Search**: Category/brand filters, keyword matching, listing sort order
//! - **Cart**: Shopping cart lines merged by product and size, wishlists
//! - **Checkout**: Delivery addresses, orders and their status lifecycle
//! - **Reviews**: Ratings and their average
//!
//! # Example
//!
//! ```rust,ignore
//! use shop_commerce::prelude::*;
//!
//! let product = Product::from_draft(&draft, Currency::INR)?;
//!
//! let mut cart = Cart::new(user_id.clone(), Currency::INR);
//! product.check_stock(Some("M"), 2)?;
//! cart.add_item(CartItem::from_product(&product, Some("M"), 2)?)?;
//!
//! let order = Order::from_cart(&cart, &address, PaymentMethod::Online)?;
//! println!("Total: {}", order.total_amount.display());
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod review;
pub mod search;

#[cfg(feature = "storage")]
mod storage;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{FeatureImage, Product, ProductDraft, SizeDetail, SizeDraft};

    // Cart
    pub use crate::cart::{Cart, CartItem, Wishlist, WishlistItem, MAX_QUANTITY_PER_ITEM};

    // Checkout
    pub use crate::checkout::{
        Address, AddressDraft, AddressSnapshot, Order, OrderItem, OrderStatus, PaymentMethod,
        PaymentStatus, MAX_ADDRESSES_PER_USER,
    };

    // Reviews
    pub use crate::review::{average_rating, Review};

    // Search
    pub use crate::search::{keyword_matches, ProductFilter, SortOption};
}
