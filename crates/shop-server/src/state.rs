//! Shared application state.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use shop_auth::{AuthService, AuthSettings, OtpMailer};
use shop_cache::Cache;
use shop_commerce::prelude::*;
use shop_db::{Collection, DocumentStore};
use shop_payment::PaymentGateway;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::info;

use crate::config::ShopConfig;

/// State handed to every handler.
pub type SharedState = Arc<AppState>;

/// Services and collections behind the API.
pub struct AppState {
    pub config: ShopConfig,
    pub currency: Currency,
    pub auth: AuthService,
    pub gateway: Arc<dyn PaymentGateway>,

    pub products: Collection<Product>,
    pub carts: Collection<Cart>,
    pub wishlists: Collection<Wishlist>,
    pub addresses: Collection<Address>,
    pub orders: Collection<Order>,
    pub reviews: Collection<Review>,
    pub features: Collection<FeatureImage>,

    /// Held while stock is checked and decremented.
    pub(crate) inventory: Mutex<()>,

    /// Held while a review is checked, inserted and folded into the average.
    pub(crate) review_writes: Mutex<()>,

    /// Per-user locks over read-modify-write of carts, wishlists and addresses.
    pub(crate) user_locks: UserLocks,
}

/// One lock per user, created on demand.
///
/// Entries nobody holds are dropped the next time a lock is taken, so the
/// map only grows with concurrently active users.
#[derive(Default)]
pub struct UserLocks {
    locks: Mutex<HashMap<UserId, Arc<Mutex<()>>>>,
}

impl UserLocks {
    pub async fn lock(&self, user_id: &UserId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks.entry(user_id.clone()).or_default().clone()
        };
        lock.lock_owned().await
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.locks.lock().await.len()
    }
}

impl AppState {
    pub fn new(
        config: ShopConfig,
        store: Arc<dyn DocumentStore>,
        cache: Cache,
        mailer: Arc<dyn OtpMailer>,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Result<Self> {
        let currency = config.payment.currency()?;
        let settings = AuthSettings {
            session_ttl: config.auth.session_ttl(),
            otp_ttl: config.auth.otp_ttl(),
        };

        Ok(Self {
            auth: AuthService::new(store.clone(), cache, mailer, settings),
            currency,
            gateway,
            products: Collection::new(store.clone()),
            carts: Collection::new(store.clone()),
            wishlists: Collection::new(store.clone()),
            addresses: Collection::new(store.clone()),
            orders: Collection::new(store.clone()),
            reviews: Collection::new(store.clone()),
            features: Collection::new(store),
            inventory: Mutex::new(()),
            review_writes: Mutex::new(()),
            user_locks: UserLocks::default(),
            config,
        })
    }

    /// Replace the auth service, e.g. to use a cheaper password hasher.
    pub fn with_auth(mut self, auth: AuthService) -> Self {
        self.auth = auth;
        self
    }

    /// Create or promote the configured admin account.
    pub async fn bootstrap_admin(&self) -> Result<()> {
        let Some(admin) = &self.config.auth.admin else {
            return Ok(());
        };
        let user = self
            .auth
            .ensure_admin(&admin.email, &admin.password, &admin.user_name)
            .await?;
        info!(user_id = %user.id, email = %user.email, "admin account ready");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_user_locks_are_independent() {
        let locks = UserLocks::default();
        let a = UserId::new("user-a");
        let b = UserId::new("user-b");

        let _held = locks.lock(&a).await;
        // Another user is not blocked by `a`.
        let other = tokio::time::timeout(Duration::from_millis(100), locks.lock(&b)).await;
        assert!(other.is_ok());
        // The same user is.
        let same = tokio::time::timeout(Duration::from_millis(50), locks.lock(&a)).await;
        assert!(same.is_err());
    }

    #[tokio::test]
    async fn test_idle_user_locks_are_pruned() {
        let locks = UserLocks::default();
        let a = UserId::new("user-a");
        let b = UserId::new("user-b");

        drop(locks.lock(&a).await);
        let _held = locks.lock(&b).await;
        assert_eq!(locks.len().await, 1);
    }
}
