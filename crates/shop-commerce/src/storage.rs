//! Document store bindings for the domain types.
//!
//! Carts and wishlists are keyed by their owner, so each user has at most
//! one of each and they can be fetched without a scan.

use shop_db::Document;

use crate::cart::{Cart, Wishlist};
use crate::catalog::{FeatureImage, Product};
use crate::checkout::{Address, Order};
use crate::review::Review;

impl Document for Product {
    const COLLECTION: &'static str = "products";

    fn id(&self) -> &str {
        self.id.as_str()
    }
}

impl Document for Cart {
    const COLLECTION: &'static str = "carts";

    fn id(&self) -> &str {
        self.user_id.as_str()
    }
}

impl Document for Wishlist {
    const COLLECTION: &'static str = "wishlists";

    fn id(&self) -> &str {
        self.user_id.as_str()
    }
}

impl Document for Address {
    const COLLECTION: &'static str = "addresses";

    fn id(&self) -> &str {
        self.id.as_str()
    }
}

impl Document for Order {
    const COLLECTION: &'static str = "orders";

    fn id(&self) -> &str {
        self.id.as_str()
    }
}

impl Document for Review {
    const COLLECTION: &'static str = "reviews";

    fn id(&self) -> &str {
        self.id.as_str()
    }
}

impl Document for FeatureImage {
    const COLLECTION: &'static str = "features";

    fn id(&self) -> &str {
        self.id.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::UserId;
    use crate::money::Currency;
    use shop_db::{Collection, MemoryStore};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_cart_is_keyed_by_owner() {
        let carts = Collection::<Cart>::new(Arc::new(MemoryStore::new()));
        let cart = Cart::new(UserId::new("user-9"), Currency::INR);
        carts.insert(&cart).await.unwrap();

        let loaded = carts.require("user-9").await.unwrap();
        assert_eq!(loaded, cart);
    }
}
