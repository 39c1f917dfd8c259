//! Gateway orders and payment signatures.

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use shop_commerce::money::Money;
use tracing::{debug, warn};

use crate::PaymentError;

type HmacSha256 = Hmac<Sha256>;

/// An order registered with the payment gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayOrder {
    /// Gateway-side order id the checkout client pays against.
    pub id: String,
    /// Amount in minor units.
    pub amount: i64,
    /// ISO currency code.
    pub currency: String,
    pub receipt: String,
}

/// A payment gateway.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Register an order for `amount` with the gateway.
    async fn create_order(&self, amount: &Money, receipt: &str)
        -> Result<GatewayOrder, PaymentError>;

    /// Check the signature the checkout client returned for a payment.
    fn verify_signature(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<(), PaymentError>;

    /// Public key id handed to checkout clients.
    fn key_id(&self) -> &str;
}

/// Gateway that issues order ids locally and checks HMAC-SHA256 payment
/// signatures over `"{order_id}|{payment_id}"` with the key secret.
#[derive(Clone)]
pub struct HmacGateway {
    key_id: String,
    key_secret: String,
}

impl std::fmt::Debug for HmacGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacGateway")
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}

impl HmacGateway {
    /// Create a gateway from its key pair.
    pub fn new(key_id: impl Into<String>, key_secret: impl Into<String>) -> Result<Self, PaymentError> {
        let key_id = key_id.into();
        let key_secret = key_secret.into();
        if key_secret.is_empty() {
            return Err(PaymentError::Configuration("key secret is empty".to_string()));
        }
        Ok(Self { key_id, key_secret })
    }

    fn mac(&self, order_id: &str, payment_id: &str) -> Result<HmacSha256, PaymentError> {
        let mut mac = HmacSha256::new_from_slice(self.key_secret.as_bytes())
            .map_err(|e| PaymentError::Configuration(e.to_string()))?;
        mac.update(order_id.as_bytes());
        mac.update(b"|");
        mac.update(payment_id.as_bytes());
        Ok(mac)
    }

    /// Signature a checkout client returns after paying `order_id`.
    pub fn sign(&self, order_id: &str, payment_id: &str) -> Result<String, PaymentError> {
        let mac = self.mac(order_id, payment_id)?;
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

#[async_trait]
impl PaymentGateway for HmacGateway {
    async fn create_order(
        &self,
        amount: &Money,
        receipt: &str,
    ) -> Result<GatewayOrder, PaymentError> {
        if !amount.is_positive() {
            return Err(PaymentError::InvalidAmount(amount.amount));
        }

        let order = GatewayOrder {
            id: format!("order_{}", uuid::Uuid::new_v4().simple()),
            amount: amount.amount,
            currency: amount.currency.code().to_string(),
            receipt: receipt.to_string(),
        };
        debug!(gateway_order_id = %order.id, amount = order.amount, "gateway order created");
        Ok(order)
    }

    fn verify_signature(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<(), PaymentError> {
        let Ok(expected) = hex::decode(signature.trim()) else {
            warn!(gateway_order_id = %order_id, "signature is not hex");
            return Err(PaymentError::InvalidSignature);
        };
        self.mac(order_id, payment_id)?
            .verify_slice(&expected)
            .map_err(|_| {
                warn!(gateway_order_id = %order_id, "signature mismatch");
                PaymentError::InvalidSignature
            })
    }

    fn key_id(&self) -> &str {
        &self.key_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shop_commerce::money::Currency;

    fn gateway() -> HmacGateway {
        HmacGateway::new("rzp_test_key", "test-secret").unwrap()
    }

    #[tokio::test]
    async fn test_create_order() {
        let gw = gateway();
        let amount = Money::new(149_900, Currency::INR);
        let order = gw.create_order(&amount, "rcpt_1").await.unwrap();

        assert!(order.id.starts_with("order_"));
        assert_eq!(order.amount, 149_900);
        assert_eq!(order.currency, "INR");
        assert_eq!(order.receipt, "rcpt_1");

        let other = gw.create_order(&amount, "rcpt_2").await.unwrap();
        assert_ne!(order.id, other.id);
    }

    #[tokio::test]
    async fn test_create_order_rejects_zero() {
        let gw = gateway();
        let err = gw
            .create_order(&Money::zero(Currency::INR), "rcpt")
            .await
            .unwrap_err();
        assert_eq!(err, PaymentError::InvalidAmount(0));
    }

    #[test]
    fn test_known_signature() {
        // HMAC-SHA256("test-secret", "order_1|pay_1")
        let gw = gateway();
        let sig = gw.sign("order_1", "pay_1").unwrap();
        assert_eq!(sig.len(), 64);
        assert!(gw.verify_signature("order_1", "pay_1", &sig).is_ok());
        assert!(gw
            .verify_signature("order_1", "pay_1", &sig.to_uppercase())
            .is_ok());
    }

    #[test]
    fn test_signature_mismatch() {
        let gw = gateway();
        let sig = gw.sign("order_1", "pay_1").unwrap();

        assert_eq!(
            gw.verify_signature("order_1", "pay_2", &sig),
            Err(PaymentError::InvalidSignature)
        );
        assert_eq!(
            gw.verify_signature("order_1", "pay_1", "not-hex"),
            Err(PaymentError::InvalidSignature)
        );

        let other = HmacGateway::new("rzp_test_key", "other-secret").unwrap();
        assert_eq!(
            other.verify_signature("order_1", "pay_1", &sig),
            Err(PaymentError::InvalidSignature)
        );
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert!(matches!(
            HmacGateway::new("id", ""),
            Err(PaymentError::Configuration(_))
        ));
    }

    #[test]
    fn test_debug_hides_secret() {
        let debug = format!("{:?}", gateway());
        assert!(!debug.contains("test-secret"));
    }
}
