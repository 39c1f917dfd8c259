//! Cart module.
//!
//! Contains the shopping cart and the wishlist.

mod cart;
mod wishlist;

pub use cart::{Cart, CartItem, MAX_QUANTITY_PER_ITEM};
pub use wishlist::{Wishlist, WishlistItem};
