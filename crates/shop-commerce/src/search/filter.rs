//! Listing filters and keyword search.

use serde::{Deserialize, Serialize};

use crate::catalog::Product;

/// Category and brand filter for product listings.
///
/// Each list is an OR over its values; the two lists combine with AND.
/// An empty list does not restrict.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ProductFilter {
    pub categories: Vec<String>,
    pub brands: Vec<String>,
}

impl ProductFilter {
    /// Build a filter from comma-separated query values.
    ///
    /// ```
    /// use shop_commerce::search::ProductFilter;
    /// let filter = ProductFilter::from_query(Some("men,women"), None);
    /// assert_eq!(filter.categories, vec!["men", "women"]);
    /// ```
    pub fn from_query(category: Option<&str>, brand: Option<&str>) -> Self {
        Self {
            categories: split_list(category),
            brands: split_list(brand),
        }
    }

    /// Whether the filter restricts anything.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.brands.is_empty()
    }

    /// Check a product against the filter.
    pub fn matches(&self, product: &Product) -> bool {
        let category_ok = self.categories.is_empty()
            || self
                .categories
                .iter()
                .any(|c| c.eq_ignore_ascii_case(&product.category));
        let brand_ok = self.brands.is_empty()
            || self
                .brands
                .iter()
                .any(|b| b.eq_ignore_ascii_case(&product.brand));
        category_ok && brand_ok
    }

    /// Keep only matching products.
    pub fn apply(&self, products: Vec<Product>) -> Vec<Product> {
        products.into_iter().filter(|p| self.matches(p)).collect()
    }
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Case-insensitive substring match on title, description, category, and brand.
pub fn keyword_matches(product: &Product, keyword: &str) -> bool {
    let needle = keyword.trim().to_lowercase();
    [
        &product.title,
        &product.description,
        &product.category,
        &product.brand,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ProductDraft;
    use crate::money::Currency;

    fn product(title: &str, category: &str, brand: &str) -> Product {
        let draft = ProductDraft {
            title: title.to_string(),
            description: format!("{title} description"),
            category: category.to_string(),
            brand: brand.to_string(),
            price: 100.0,
            total_stock: Some(1),
            ..ProductDraft::default()
        };
        Product::from_draft(&draft, Currency::INR).unwrap()
    }

    #[test]
    fn test_from_query_splits_and_trims() {
        let filter = ProductFilter::from_query(Some(" men , ,kids"), Some(""));
        assert_eq!(filter.categories, vec!["men", "kids"]);
        assert!(filter.brands.is_empty());
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = ProductFilter::default();
        assert!(filter.is_empty());
        assert!(filter.matches(&product("Shirt", "men", "nike")));
    }

    #[test]
    fn test_category_and_brand_combine() {
        let filter = ProductFilter::from_query(Some("men,women"), Some("nike"));
        assert!(filter.matches(&product("Shirt", "men", "nike")));
        assert!(!filter.matches(&product("Shirt", "men", "puma")));
        assert!(!filter.matches(&product("Shirt", "kids", "nike")));
    }

    #[test]
    fn test_keyword_matches_any_field() {
        let shoe = product("Running Shoe", "footwear", "Adidas");
        assert!(keyword_matches(&shoe, "running"));
        assert!(keyword_matches(&shoe, "FOOT"));
        assert!(keyword_matches(&shoe, "adidas"));
        assert!(keyword_matches(&shoe, "description"));
        assert!(!keyword_matches(&shoe, "sandal"));
    }
}
