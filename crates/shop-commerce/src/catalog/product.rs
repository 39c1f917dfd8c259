//! Product types, admin drafts, and stock rules.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::{Currency, Money};

/// Stock and optional price overrides for one size of a product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SizeDetail {
    /// Units in stock for this size.
    pub stock: i64,
    /// Price override for this size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Money>,
    /// Sale price override for this size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<Money>,
}

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Image URL.
    pub image: Option<String>,
    pub title: String,
    pub description: String,
    pub category: String,
    pub brand: String,
    /// Regular price.
    pub price: Money,
    /// Sale price; wins over `price` when positive.
    pub sale_price: Option<Money>,
    /// Units in stock across all sizes.
    pub total_stock: i64,
    /// Mean review rating, 0 when unreviewed.
    pub average_review: f64,
    /// Per-size stock keyed by size label (S, M, L, ...).
    #[serde(default)]
    pub sizes: BTreeMap<String, SizeDetail>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Size entry of a [`ProductDraft`], prices in major units.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SizeDraft {
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub sale_price: Option<f64>,
}

/// Admin form input for creating or editing a product.
///
/// Prices are decimal amounts in major units as entered by an admin.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub sale_price: Option<f64>,
    /// Defaults to the sum of size stocks when absent.
    #[serde(default)]
    pub total_stock: Option<i64>,
    #[serde(default)]
    pub sizes: BTreeMap<String, SizeDraft>,
}

/// Validated product fields produced from a draft.
struct DraftFields {
    image: Option<String>,
    title: String,
    description: String,
    category: String,
    brand: String,
    price: Money,
    sale_price: Option<Money>,
    total_stock: i64,
    sizes: BTreeMap<String, SizeDetail>,
}

impl ProductDraft {
    fn validate(&self, currency: Currency) -> Result<DraftFields, CommerceError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(CommerceError::validation("title is required"));
        }
        let category = self.category.trim();
        if category.is_empty() {
            return Err(CommerceError::validation("category is required"));
        }

        let price = positive_money("price", self.price, currency)?;
        let sale_price = sale_money("salePrice", self.sale_price, price, currency)?;

        let mut sizes = BTreeMap::new();
        for (label, size) in &self.sizes {
            let label = label.trim();
            if label.is_empty() {
                return Err(CommerceError::validation("size label must not be empty"));
            }
            if size.stock < 0 {
                return Err(CommerceError::validation(format!(
                    "stock for size {label} must not be negative"
                )));
            }
            let size_price = match size.price {
                Some(value) => Some(positive_money("size price", value, currency)?),
                None => None,
            };
            let size_sale = sale_money(
                "size salePrice",
                size.sale_price,
                size_price.unwrap_or(price),
                currency,
            )?;
            sizes.insert(
                label.to_string(),
                SizeDetail {
                    stock: size.stock,
                    price: size_price,
                    sale_price: size_sale,
                },
            );
        }

        let size_stock: i64 = sizes.values().map(|s| s.stock).sum();
        let total_stock = match self.total_stock {
            Some(stock) if stock < 0 => {
                return Err(CommerceError::validation("totalStock must not be negative"))
            }
            Some(stock) if stock < size_stock => {
                return Err(CommerceError::validation(format!(
                    "totalStock must cover the size stock ({size_stock})"
                )))
            }
            Some(stock) => stock,
            None => size_stock,
        };

        let image = self
            .image
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string);

        Ok(DraftFields {
            image,
            title: title.to_string(),
            description: self.description.trim().to_string(),
            category: category.to_string(),
            brand: self.brand.trim().to_string(),
            price,
            sale_price,
            total_stock,
            sizes,
        })
    }
}

fn positive_money(field: &str, value: f64, currency: Currency) -> Result<Money, CommerceError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CommerceError::validation(format!(
            "{field} must be greater than zero"
        )));
    }
    Ok(Money::from_decimal(value, currency))
}

/// A zero sale price means "no sale".
fn sale_money(
    field: &str,
    value: Option<f64>,
    ceiling: Money,
    currency: Currency,
) -> Result<Option<Money>, CommerceError> {
    let Some(value) = value else {
        return Ok(None);
    };
    if !value.is_finite() || value < 0.0 {
        return Err(CommerceError::validation(format!(
            "{field} must not be negative"
        )));
    }
    let sale = Money::from_decimal(value, currency);
    if sale.amount > ceiling.amount {
        return Err(CommerceError::validation(format!(
            "{field} must not exceed the price"
        )));
    }
    Ok(sale.is_positive().then_some(sale))
}

impl Product {
    /// Create a product from an admin draft.
    pub fn from_draft(draft: &ProductDraft, currency: Currency) -> Result<Self, CommerceError> {
        let fields = draft.validate(currency)?;
        let now = Utc::now();
        Ok(Self {
            id: ProductId::generate(),
            image: fields.image,
            title: fields.title,
            description: fields.description,
            category: fields.category,
            brand: fields.brand,
            price: fields.price,
            sale_price: fields.sale_price,
            total_stock: fields.total_stock,
            average_review: 0.0,
            sizes: fields.sizes,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replace the editable fields from an admin draft.
    ///
    /// The id, creation time, and review average are kept. An edit without
    /// an image keeps the current image.
    pub fn apply_draft(&mut self, draft: &ProductDraft) -> Result<(), CommerceError> {
        let fields = draft.validate(self.price.currency)?;
        if fields.image.is_some() {
            self.image = fields.image;
        }
        self.title = fields.title;
        self.description = fields.description;
        self.category = fields.category;
        self.brand = fields.brand;
        self.price = fields.price;
        self.sale_price = fields.sale_price;
        self.total_stock = fields.total_stock;
        self.sizes = fields.sizes;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Whether stock is tracked per size.
    pub fn has_sizes(&self) -> bool {
        !self.sizes.is_empty()
    }

    /// Resolve the size detail for a request.
    ///
    /// Unsized products ignore `size` and yield `None`.
    pub fn size_detail(&self, size: Option<&str>) -> Result<Option<&SizeDetail>, CommerceError> {
        if !self.has_sizes() {
            return Ok(None);
        }
        let size = size
            .filter(|s| !s.is_empty())
            .ok_or_else(|| CommerceError::SizeRequired(self.id.to_string()))?;
        self.sizes
            .get(size)
            .map(Some)
            .ok_or_else(|| CommerceError::UnknownSize {
                product_id: self.id.to_string(),
                size: size.to_string(),
            })
    }

    /// Normalize a requested size: `None` for unsized products.
    pub fn normalize_size(&self, size: Option<&str>) -> Result<Option<String>, CommerceError> {
        self.size_detail(size)?;
        Ok(if self.has_sizes() {
            size.map(str::to_string)
        } else {
            None
        })
    }

    /// Units available for the given size (or in total for unsized products).
    ///
    /// A size never offers more than the product's total stock.
    pub fn available_stock(&self, size: Option<&str>) -> Result<i64, CommerceError> {
        Ok(match self.size_detail(size)? {
            Some(detail) => detail.stock.min(self.total_stock),
            None => self.total_stock,
        })
    }

    /// Regular and sale price for the given size.
    ///
    /// A size with its own price also supplies its own sale price; a size
    /// without one falls back to the product prices.
    pub fn price_for(&self, size: Option<&str>) -> Result<(Money, Option<Money>), CommerceError> {
        Ok(match self.size_detail(size)? {
            Some(SizeDetail {
                price: Some(price),
                sale_price,
                ..
            }) => (*price, *sale_price),
            Some(detail) => (self.price, detail.sale_price.or(self.sale_price)),
            None => (self.price, self.sale_price),
        })
    }

    /// The price a customer pays for one unit of the given size.
    pub fn unit_price(&self, size: Option<&str>) -> Result<Money, CommerceError> {
        let (price, sale_price) = self.price_for(size)?;
        Ok(effective_price(price, sale_price))
    }

    /// Check that `quantity` units of `size` can be sold.
    pub fn check_stock(&self, size: Option<&str>, quantity: i64) -> Result<(), CommerceError> {
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        let available = self.available_stock(size)?;
        if available < quantity {
            return Err(CommerceError::InsufficientStock {
                product_id: self.id.to_string(),
                size: size.filter(|_| self.has_sizes()).map(str::to_string),
                requested: quantity,
                available,
            });
        }
        Ok(())
    }

    /// Remove sold units from the size stock (if sized) and the total stock.
    ///
    /// Stock never goes below zero.
    pub fn decrement_stock(&mut self, size: Option<&str>, quantity: i64) -> Result<(), CommerceError> {
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        if self.has_sizes() {
            // Validates presence of the size before touching anything.
            self.size_detail(size)?;
            if let Some(detail) = size.and_then(|s| self.sizes.get_mut(s)) {
                detail.stock = (detail.stock - quantity).max(0);
            }
        }
        self.total_stock = (self.total_stock - quantity).max(0);
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Sale price when positive, otherwise the regular price.
pub fn effective_price(price: Money, sale_price: Option<Money>) -> Money {
    match sale_price {
        Some(sale) if sale.is_positive() => sale,
        _ => price,
    }
}
