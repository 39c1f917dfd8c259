//! Product reviews.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CommerceError;
use crate::ids::{ProductId, ReviewId, UserId};

/// Lowest accepted rating.
pub const MIN_RATING: i64 = 1;
/// Highest accepted rating.
pub const MAX_RATING: i64 = 5;

/// A customer's review of a purchased product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub product_id: ProductId,
    pub user_id: UserId,
    pub user_name: String,
    pub review_message: String,
    /// Rating from 1 to 5.
    pub review_value: i64,
    pub created_at: DateTime<Utc>,
}

impl Review {
    /// Create a review, validating the rating and message.
    pub fn new(
        product_id: ProductId,
        user_id: UserId,
        user_name: impl Into<String>,
        message: impl Into<String>,
        value: i64,
    ) -> Result<Self, CommerceError> {
        if !(MIN_RATING..=MAX_RATING).contains(&value) {
            return Err(CommerceError::validation(format!(
                "reviewValue must be between {MIN_RATING} and {MAX_RATING}"
            )));
        }
        let message = message.into();
        let message = message.trim();
        if message.is_empty() {
            return Err(CommerceError::validation("reviewMessage is required"));
        }

        Ok(Self {
            id: ReviewId::generate(),
            product_id,
            user_id,
            user_name: user_name.into(),
            review_message: message.to_string(),
            review_value: value,
            created_at: Utc::now(),
        })
    }
}

/// Mean rating of `reviews`, 0 when there are none.
pub fn average_rating(reviews: &[Review]) -> f64 {
    if reviews.is_empty() {
        return 0.0;
    }
    let sum: i64 = reviews.iter().map(|r| r.review_value).sum();
    sum as f64 / reviews.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(value: i64) -> Review {
        Review::new(
            ProductId::new("p1"),
            UserId::new("u1"),
            "Asha",
            "Great fit",
            value,
        )
        .unwrap()
    }

    #[test]
    fn test_rating_bounds() {
        assert!(Review::new(ProductId::new("p1"), UserId::new("u1"), "A", "ok", 0).is_err());
        assert!(Review::new(ProductId::new("p1"), UserId::new("u1"), "A", "ok", 6).is_err());
        assert_eq!(review(5).review_value, 5);
    }

    #[test]
    fn test_message_required() {
        let err = Review::new(ProductId::new("p1"), UserId::new("u1"), "A", "   ", 4);
        assert!(matches!(err, Err(CommerceError::ValidationError(_))));
    }

    #[test]
    fn test_average_rating() {
        assert_eq!(average_rating(&[]), 0.0);
        let reviews = vec![review(5), review(4), review(3)];
        assert!((average_rating(&reviews) - 4.0).abs() < f64::EPSILON);
    }
}
