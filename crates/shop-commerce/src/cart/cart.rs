//! Cart and cart line types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{effective_price, Product};
use crate::error::CommerceError;
use crate::ids::{CartId, ProductId, UserId};
use crate::money::{Currency, Money};

/// Maximum quantity allowed per line item.
pub const MAX_QUANTITY_PER_ITEM: i64 = 9999;

/// A user's shopping cart. Each user has at most one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Unique cart identifier.
    pub id: CartId,
    /// Owner of the cart.
    pub user_id: UserId,
    /// Items in the cart.
    pub items: Vec<CartItem>,
    /// Cart currency.
    pub currency: Currency,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A line in the cart: one product in one size.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: ProductId,
    pub quantity: i64,
    /// Selected size; `None` for unsized products.
    #[serde(default)]
    pub size: Option<String>,
    /// Regular unit price.
    pub price: Money,
    /// Sale unit price, if on sale.
    #[serde(default)]
    pub sale_price: Option<Money>,
    /// Product title (denormalized for display).
    pub title: String,
    /// Product image (denormalized for display).
    pub image: Option<String>,
}

impl CartItem {
    /// Build a line for `quantity` units of `product` in `size`, priced from
    /// the catalog.
    pub fn from_product(
        product: &Product,
        size: Option<&str>,
        quantity: i64,
    ) -> Result<Self, CommerceError> {
        let size = product.normalize_size(size)?;
        let (price, sale_price) = product.price_for(size.as_deref())?;
        Ok(Self {
            product_id: product.id.clone(),
            quantity,
            size,
            price,
            sale_price,
            title: product.title.clone(),
            image: product.image.clone(),
        })
    }

    /// Price paid for one unit.
    pub fn unit_price(&self) -> Money {
        effective_price(self.price, self.sale_price)
    }

    /// Unit price times quantity.
    pub fn line_total(&self) -> Result<Money, CommerceError> {
        self.unit_price()
            .try_multiply(self.quantity)
            .ok_or(CommerceError::Overflow)
    }

    /// Whether this line is for `product_id` in `size`.
    pub fn is_line(&self, product_id: &ProductId, size: Option<&str>) -> bool {
        &self.product_id == product_id && self.size.as_deref() == size
    }

    /// Refresh the denormalized title, image, and prices from the catalog.
    pub fn refresh_from(&mut self, product: &Product) {
        self.title = product.title.clone();
        self.image = product.image.clone();
        if let Ok((price, sale_price)) = product.price_for(self.size.as_deref()) {
            self.price = price;
            self.sale_price = sale_price;
        }
    }
}

impl Cart {
    /// Create an empty cart for a user.
    pub fn new(user_id: UserId, currency: Currency) -> Self {
        let now = Utc::now();
        Self {
            id: CartId::generate(),
            user_id,
            items: Vec::new(),
            currency,
            created_at: now,
            updated_at: now,
        }
    }

    /// Quantity already in the cart for `product_id` in `size`.
    pub fn quantity_of(&self, product_id: &ProductId, size: Option<&str>) -> i64 {
        self.items
            .iter()
            .find(|i| i.is_line(product_id, size))
            .map_or(0, |i| i.quantity)
    }

    /// Add an item to the cart, merging with an existing line for the same
    /// product and size.
    ///
    /// Returns the line's quantity after the merge. Returns an error if:
    /// - Quantity is not positive
    /// - Adding would exceed MAX_QUANTITY_PER_ITEM
    /// - Arithmetic overflow would occur
    pub fn add_item(&mut self, item: CartItem) -> Result<i64, CommerceError> {
        if item.quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(item.quantity));
        }

        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|i| i.is_line(&item.product_id, item.size.as_deref()))
        {
            let new_quantity = existing
                .quantity
                .checked_add(item.quantity)
                .ok_or(CommerceError::Overflow)?;

            if new_quantity > MAX_QUANTITY_PER_ITEM {
                return Err(CommerceError::QuantityExceedsLimit(
                    new_quantity,
                    MAX_QUANTITY_PER_ITEM,
                ));
            }

            existing.quantity = new_quantity;
            existing.price = item.price;
            existing.sale_price = item.sale_price;
            self.updated_at = Utc::now();
            return Ok(new_quantity);
        }

        if item.quantity > MAX_QUANTITY_PER_ITEM {
            return Err(CommerceError::QuantityExceedsLimit(
                item.quantity,
                MAX_QUANTITY_PER_ITEM,
            ));
        }

        let quantity = item.quantity;
        self.items.push(item);
        self.updated_at = Utc::now();
        Ok(quantity)
    }

    /// Set the quantity of an existing line.
    pub fn set_quantity(
        &mut self,
        product_id: &ProductId,
        size: Option<&str>,
        quantity: i64,
    ) -> Result<(), CommerceError> {
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        if quantity > MAX_QUANTITY_PER_ITEM {
            return Err(CommerceError::QuantityExceedsLimit(
                quantity,
                MAX_QUANTITY_PER_ITEM,
            ));
        }

        let item = self
            .items
            .iter_mut()
            .find(|i| i.is_line(product_id, size))
            .ok_or_else(|| CommerceError::ItemNotInCart(product_id.to_string()))?;
        item.quantity = quantity;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Remove lines for a product. With a size, only that size's line goes;
    /// without one, every line of the product goes.
    pub fn remove_product(&mut self, product_id: &ProductId, size: Option<&str>) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| match size {
            Some(_) => !i.is_line(product_id, size),
            None => &i.product_id != product_id,
        });
        let removed = self.items.len() < len_before;
        if removed {
            self.updated_at = Utc::now();
        }
        removed
    }

    /// Keep only lines whose product satisfies `keep`. Returns how many
    /// lines were dropped.
    pub fn retain_products<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&ProductId) -> bool,
    {
        let len_before = self.items.len();
        self.items.retain(|i| keep(&i.product_id));
        let dropped = len_before - self.items.len();
        if dropped > 0 {
            self.updated_at = Utc::now();
        }
        dropped
    }

    /// Clear all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.updated_at = Utc::now();
    }

    /// Get total item count (sum of quantities).
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of line totals.
    pub fn total(&self) -> Result<Money, CommerceError> {
        self.items
            .iter()
            .try_fold(Money::zero(self.currency), |acc, item| {
                let line = item.line_total()?;
                acc.try_add(&line).ok_or_else(|| CommerceError::CurrencyMismatch {
                    expected: self.currency.code().to_string(),
                    got: line.currency.code().to_string(),
                })
            })
    }
}
