//! HTTP API for the storefront.
//!
//! Customer routes live under `/api/shop`, the admin console under
//! `/api/admin`, accounts under `/api/auth`, and banner images under
//! `/api/common/feature`. Every JSON response uses the
//! `{ success, message?, data? }` envelope.
//!
//! # Example
//!
//! ```rust,ignore
//! use shop_server::{router, AppState, ShopConfig};
//!
//! let config = ShopConfig::resolve(None)?;
//! let state = AppState::new(config, store, Cache::new(), mailer, gateway)?;
//! let app = router(Arc::new(state));
//! axum::serve(listener, app).await?;
//! ```

pub mod checkout;
pub mod config;
pub mod error;
pub mod extract;
pub mod response;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use config::ShopConfig;
pub use error::{ApiError, ApiResult};
pub use response::ApiResponse;
pub use routes::router;
pub use state::{AppState, SharedState};
