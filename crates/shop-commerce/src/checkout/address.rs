//! Address types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CommerceError;
use crate::ids::{AddressId, UserId};

/// Maximum number of saved addresses per user.
pub const MAX_ADDRESSES_PER_USER: usize = 3;

/// A saved delivery address.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: AddressId,
    /// Owner of the address.
    pub user_id: UserId,
    /// Street address.
    pub address: String,
    pub city: String,
    /// Postal code.
    pub pincode: String,
    pub phone: String,
    /// Delivery notes.
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Address form input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AddressDraft {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub pincode: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub notes: String,
}

impl AddressDraft {
    fn validate(&self) -> Result<(), CommerceError> {
        for (field, value) in [
            ("address", &self.address),
            ("city", &self.city),
            ("pincode", &self.pincode),
            ("phone", &self.phone),
        ] {
            if value.trim().is_empty() {
                return Err(CommerceError::validation(format!("{field} is required")));
            }
        }
        Ok(())
    }
}

impl Address {
    /// Create an address for `user_id` from form input.
    pub fn from_draft(user_id: UserId, draft: &AddressDraft) -> Result<Self, CommerceError> {
        draft.validate()?;
        let now = Utc::now();
        Ok(Self {
            id: AddressId::generate(),
            user_id,
            address: draft.address.trim().to_string(),
            city: draft.city.trim().to_string(),
            pincode: draft.pincode.trim().to_string(),
            phone: draft.phone.trim().to_string(),
            notes: draft.notes.trim().to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Replace all fields from form input.
    pub fn apply_draft(&mut self, draft: &AddressDraft) -> Result<(), CommerceError> {
        draft.validate()?;
        self.address = draft.address.trim().to_string();
        self.city = draft.city.trim().to_string();
        self.pincode = draft.pincode.trim().to_string();
        self.phone = draft.phone.trim().to_string();
        self.notes = draft.notes.trim().to_string();
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Format as single line.
    pub fn one_line(&self) -> String {
        format!("{}, {} {}", self.address, self.city, self.pincode)
    }
}

/// Fail when a user already holds the maximum number of addresses.
pub fn check_address_limit(existing: usize) -> Result<(), CommerceError> {
    if existing >= MAX_ADDRESSES_PER_USER {
        return Err(CommerceError::AddressLimitReached(MAX_ADDRESSES_PER_USER));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> AddressDraft {
        AddressDraft {
            address: "12 MG Road".to_string(),
            city: "Pune".to_string(),
            pincode: "411001".to_string(),
            phone: "9999999999".to_string(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_from_draft() {
        let address = Address::from_draft(UserId::new("u1"), &draft()).unwrap();
        assert_eq!(address.one_line(), "12 MG Road, Pune 411001");
    }

    #[test]
    fn test_required_fields() {
        let mut missing = draft();
        missing.pincode = " ".to_string();
        let err = Address::from_draft(UserId::new("u1"), &missing).unwrap_err();
        assert_eq!(err, CommerceError::validation("pincode is required"));
    }

    #[test]
    fn test_apply_draft() {
        let mut address = Address::from_draft(UserId::new("u1"), &draft()).unwrap();
        let mut edit = draft();
        edit.city = "Mumbai".to_string();
        edit.notes = "Ring twice".to_string();
        address.apply_draft(&edit).unwrap();
        assert_eq!(address.city, "Mumbai");
        assert_eq!(address.notes, "Ring twice");
    }

    #[test]
    fn test_address_limit() {
        assert!(check_address_limit(0).is_ok());
        assert!(check_address_limit(MAX_ADDRESSES_PER_USER - 1).is_ok());
        assert!(matches!(
            check_address_limit(MAX_ADDRESSES_PER_USER),
            Err(CommerceError::AddressLimitReached(3))
        ));
    }
}
