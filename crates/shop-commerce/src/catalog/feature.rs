//! Storefront banner images.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CommerceError;
use crate::ids::FeatureImageId;

/// A banner image shown on the storefront home page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeatureImage {
    pub id: FeatureImageId,
    /// Image URL.
    pub image: String,
    pub created_at: DateTime<Utc>,
}

impl FeatureImage {
    /// Create a feature image from a non-empty URL.
    pub fn new(image: impl Into<String>) -> Result<Self, CommerceError> {
        let image = image.into();
        let image = image.trim();
        if image.is_empty() {
            return Err(CommerceError::validation("image is required"));
        }
        Ok(Self {
            id: FeatureImageId::generate(),
            image: image.to_string(),
            created_at: Utc::now(),
        })
    }
}
