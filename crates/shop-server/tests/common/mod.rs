//! In-process harness driving the router with `oneshot`.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use shop_auth::{AuthService, AuthSettings, PasswordHasher, RecordingMailer};
use shop_cache::Cache;
use shop_db::MemoryStore;
use shop_payment::HmacGateway;
use shop_server::{router, AppState, SharedState, ShopConfig};
use tower::ServiceExt;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "adminpass";
pub const PASSWORD: &str = "secret1";

pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub struct TestApp {
    pub app: Router,
    pub state: SharedState,
    pub mailer: Arc<RecordingMailer>,
    pub gateway: HmacGateway,
    pub upload_dir: PathBuf,
}

impl TestApp {
    pub fn new() -> Self {
        let upload_dir =
            std::env::temp_dir().join(format!("shop-test-{}", uuid::Uuid::new_v4().simple()));

        let mut config = ShopConfig::default();
        config.payment.key_secret = "test-secret".to_string();
        config.server.upload_dir = upload_dir.clone();

        let store = Arc::new(MemoryStore::new());
        let cache = Cache::new();
        let mailer = Arc::new(RecordingMailer::new());
        let gateway = HmacGateway::new("rzp_test_key", "test-secret").unwrap();

        let auth = AuthService::new(
            store.clone(),
            cache.clone(),
            mailer.clone(),
            AuthSettings::default(),
        )
        .with_hasher(PasswordHasher::with_params(1024, 1).unwrap());

        let state = AppState::new(
            config,
            store,
            cache,
            mailer.clone(),
            Arc::new(gateway.clone()),
        )
        .unwrap()
        .with_auth(auth);
        let state = Arc::new(state);

        Self {
            app: router(state.clone()),
            state,
            mailer,
            gateway,
            upload_dir,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        Response {
            status,
            headers,
            body,
        }
    }

    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Response {
        self.call(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> Response {
        self.call(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> Response {
        self.call(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> Response {
        self.call(Method::DELETE, uri, token, None).await
    }

    /// Register and log in a customer. Returns `(token, user_id)`.
    pub async fn customer(&self, email: &str) -> (String, String) {
        let res = self
            .post(
                "/api/auth/register",
                None,
                json!({ "userName": "Shopper", "email": email, "password": PASSWORD }),
            )
            .await;
        assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);
        self.login(email, PASSWORD).await
    }

    /// Log in. Returns `(token, user_id)`.
    pub async fn login(&self, email: &str, password: &str) -> (String, String) {
        let res = self
            .post(
                "/api/auth/login",
                None,
                json!({ "email": email, "password": password }),
            )
            .await;
        assert_eq!(res.status, StatusCode::OK, "{}", res.body);
        let token = res.body["token"].as_str().unwrap().to_string();
        let user_id = res.body["user"]["id"].as_str().unwrap().to_string();
        (token, user_id)
    }

    /// Create the admin account and log in as it.
    pub async fn admin(&self) -> String {
        self.state
            .auth
            .ensure_admin(ADMIN_EMAIL, ADMIN_PASSWORD, "Admin")
            .await
            .unwrap();
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await.0
    }

    /// Add a product as admin and return its id.
    pub async fn product(&self, admin: &str, draft: Value) -> String {
        let res = self
            .post("/api/admin/products/add", Some(admin), draft)
            .await;
        assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);
        res.body["data"]["id"].as_str().unwrap().to_string()
    }

    /// Add an address for `user_id` and return its id.
    pub async fn address(&self, token: &str, user_id: &str) -> String {
        let res = self
            .post(
                "/api/shop/address/add",
                Some(token),
                json!({
                    "userId": user_id,
                    "address": "12 MG Road",
                    "city": "Bengaluru",
                    "pincode": "560001",
                    "phone": "9999999999",
                    "notes": "Ring twice",
                }),
            )
            .await;
        assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);
        res.body["data"]["id"].as_str().unwrap().to_string()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.upload_dir);
    }
}

pub fn tee_draft(stock: i64) -> Value {
    json!({
        "title": "Cotton Tee",
        "description": "Plain crew neck tee",
        "category": "men",
        "brand": "nike",
        "price": 500.0,
        "salePrice": 450.0,
        "totalStock": stock,
    })
}

pub fn sized_draft() -> Value {
    json!({
        "title": "Running Shoe",
        "description": "Lightweight trainer",
        "category": "footwear",
        "brand": "adidas",
        "price": 2000.0,
        "sizes": {
            "8": { "stock": 2 },
            "9": { "stock": 1, "price": 2200.0 },
        },
    })
}
