//! Search module.
//!
//! Category/brand filtering, keyword matching, and listing sort order.

mod filter;
mod sort;

pub use filter::{keyword_matches, ProductFilter};
pub use sort::SortOption;
