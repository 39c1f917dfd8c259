//! Document identifiers.
//!
//! Every stored document type has its own id type, so a `UserId` cannot be
//! handed to something expecting a `ProductId`. Generated ids are a short
//! type prefix and a hyphenless v4 UUID (`prod_3f2a...`). Ids arriving from
//! clients are wrapped as-is.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident => $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Prefix of generated ids of this type.
            pub const PREFIX: &'static str = $prefix;

            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// A fresh id, `<prefix>_<uuid>`.
            pub fn generate() -> Self {
                Self(format!("{}_{}", Self::PREFIX, uuid::Uuid::new_v4().simple()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(
    /// Catalog product.
    ProductId => "prod"
);
define_id!(
    /// Registered account.
    UserId => "user"
);
define_id!(
    /// Shopping cart. Carts are stored under their owner's [`UserId`].
    CartId => "cart"
);
define_id!(
    /// Placed order.
    OrderId => "ord"
);
define_id!(
    /// Saved delivery address.
    AddressId => "addr"
);
define_id!(ReviewId => "rev");
define_id!(FeatureImageId => "feat");
define_id!(
    /// Wishlist. Like carts, stored under the owner's [`UserId`].
    WishlistId => "wish"
);
