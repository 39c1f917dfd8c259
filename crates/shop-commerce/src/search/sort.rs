//! Listing sort order.

use serde::{Deserialize, Serialize};

use crate::catalog::Product;

/// Sort options for product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SortOption {
    /// Sort by price, low to high.
    #[default]
    #[serde(rename = "price-lowtohigh")]
    PriceLowToHigh,
    /// Sort by price, high to low.
    #[serde(rename = "price-hightolow")]
    PriceHighToLow,
    /// Sort by title A-Z.
    #[serde(rename = "title-atoz")]
    TitleAToZ,
    /// Sort by title Z-A.
    #[serde(rename = "title-ztoa")]
    TitleZToA,
}

impl SortOption {
    /// Parse a `sortBy` query value. Unknown or missing values fall back to
    /// the default order.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("price-hightolow") => SortOption::PriceHighToLow,
            Some("title-atoz") => SortOption::TitleAToZ,
            Some("title-ztoa") => SortOption::TitleZToA,
            _ => SortOption::PriceLowToHigh,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOption::PriceLowToHigh => "price-lowtohigh",
            SortOption::PriceHighToLow => "price-hightolow",
            SortOption::TitleAToZ => "title-atoz",
            SortOption::TitleZToA => "title-ztoa",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortOption::PriceLowToHigh => "Price: Low to High",
            SortOption::PriceHighToLow => "Price: High to Low",
            SortOption::TitleAToZ => "Title: A to Z",
            SortOption::TitleZToA => "Title: Z to A",
        }
    }

    /// Sort products in place. Prices compare by regular price.
    pub fn sort(&self, products: &mut [Product]) {
        match self {
            SortOption::PriceLowToHigh => products.sort_by_key(|p| p.price.amount),
            SortOption::PriceHighToLow => {
                products.sort_by_key(|p| std::cmp::Reverse(p.price.amount))
            }
            SortOption::TitleAToZ => products.sort_by_cached_key(|p| p.title.to_lowercase()),
            SortOption::TitleZToA => {
                products.sort_by_cached_key(|p| std::cmp::Reverse(p.title.to_lowercase()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ProductDraft;
    use crate::money::Currency;

    fn product(title: &str, price: f64) -> Product {
        let draft = ProductDraft {
            title: title.to_string(),
            category: "men".to_string(),
            price,
            total_stock: Some(1),
            ..ProductDraft::default()
        };
        Product::from_draft(&draft, Currency::INR).unwrap()
    }

    fn titles(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.title.as_str()).collect()
    }

    #[test]
    fn test_parse_defaults_to_price_ascending() {
        assert_eq!(SortOption::parse(None), SortOption::PriceLowToHigh);
        assert_eq!(SortOption::parse(Some("bogus")), SortOption::PriceLowToHigh);
        assert_eq!(SortOption::parse(Some("title-ztoa")), SortOption::TitleZToA);
    }

    #[test]
    fn test_as_str_round_trips_through_parse() {
        for option in [
            SortOption::PriceLowToHigh,
            SortOption::PriceHighToLow,
            SortOption::TitleAToZ,
            SortOption::TitleZToA,
        ] {
            assert_eq!(SortOption::parse(Some(option.as_str())), option);
        }
    }

    #[test]
    fn test_sort_orders() {
        let mut products = vec![product("b", 20.0), product("C", 10.0), product("a", 30.0)];

        SortOption::PriceLowToHigh.sort(&mut products);
        assert_eq!(titles(&products), vec!["C", "b", "a"]);

        SortOption::PriceHighToLow.sort(&mut products);
        assert_eq!(titles(&products), vec!["a", "b", "C"]);

        SortOption::TitleAToZ.sort(&mut products);
        assert_eq!(titles(&products), vec!["a", "b", "C"]);

        SortOption::TitleZToA.sort(&mut products);
        assert_eq!(titles(&products), vec!["C", "b", "a"]);
    }
}
