//! Saved-for-later product lists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{effective_price, Product};
use crate::ids::{ProductId, UserId, WishlistId};
use crate::money::Money;

/// A user's wishlist. Each user has at most one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Wishlist {
    pub id: WishlistId,
    pub user_id: UserId,
    pub items: Vec<WishlistItem>,
    pub updated_at: DateTime<Utc>,
}

/// A product saved to a wishlist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    pub product_id: ProductId,
    pub title: String,
    pub image: Option<String>,
    /// Price the customer would pay when the item was saved.
    pub price: Money,
}

impl WishlistItem {
    /// Snapshot a catalog product.
    pub fn from_product(product: &Product) -> Self {
        Self {
            product_id: product.id.clone(),
            title: product.title.clone(),
            image: product.image.clone(),
            price: effective_price(product.price, product.sale_price),
        }
    }
}

impl Wishlist {
    /// Create an empty wishlist.
    pub fn new(user_id: UserId) -> Self {
        Self {
            id: WishlistId::generate(),
            user_id,
            items: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    /// Check if a product is saved.
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.items.iter().any(|i| &i.product_id == product_id)
    }

    /// Add the item if absent, remove it if present.
    ///
    /// Returns `true` when the item was added.
    pub fn toggle(&mut self, item: WishlistItem) -> bool {
        if self.remove(&item.product_id) {
            return false;
        }
        self.items.push(item);
        self.updated_at = Utc::now();
        true
    }

    /// Remove a product. Returns whether it was present.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| &i.product_id != product_id);
        let removed = self.items.len() < len_before;
        if removed {
            self.updated_at = Utc::now();
        }
        removed
    }

    /// Keep only items whose product satisfies `keep`.
    pub fn retain_products<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&ProductId) -> bool,
    {
        let len_before = self.items.len();
        self.items.retain(|i| keep(&i.product_id));
        len_before - self.items.len()
    }

    /// Remove every item.
    pub fn clear(&mut self) {
        self.items.clear();
        self.updated_at = Utc::now();
    }
}
