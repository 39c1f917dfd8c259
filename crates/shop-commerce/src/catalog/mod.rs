//! Product catalog module.
//!
//! Contains products with optional per-size stock, and the banner images
//! shown on the storefront.

mod feature;
mod product;

pub use feature::FeatureImage;
pub use product::{effective_price, Product, ProductDraft, SizeDetail, SizeDraft};
