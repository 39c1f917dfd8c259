//! `/api/auth`: registration, login, sessions, passcodes.

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use shop_auth::RegisterRequest;

use crate::config::AuthConfig;
use crate::error::{ApiError, ApiResult};
use crate::extract::{session_token, CurrentUser, JsonBody};
use crate::response::ApiResponse;
use crate::state::SharedState;

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/check-auth", get(check_auth))
        .route("/send-otp", post(send_otp))
        .route("/verify-otp", post(verify_otp))
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Deserialize)]
struct OtpRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    otp: String,
}

fn session_cookie(config: &AuthConfig, token: &str) -> String {
    let secure = if config.cookie_secure { "; Secure" } else { "" };
    format!(
        "{}={}; HttpOnly; Path=/; Max-Age={}; SameSite=Lax{}",
        config.cookie_name, token, config.session_ttl_secs, secure
    )
}

fn expired_cookie(config: &AuthConfig) -> String {
    format!("{}=; HttpOnly; Path=/; Max-Age=0", config.cookie_name)
}

async fn register(
    State(state): State<SharedState>,
    JsonBody(request): JsonBody<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = state.auth.register(&request).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(user).with_message("Registration successful"),
    ))
}

async fn login(
    State(state): State<SharedState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }
    let (session, user) = state.auth.login(&request.email, &request.password).await?;
    let cookie = session_cookie(&state.config.auth, &session.token);

    Ok((
        [(SET_COOKIE, cookie)],
        Json(json!({
            "success": true,
            "message": "Logged in successfully",
            "token": session.token,
            "expiresAt": session.expires_at,
            "user": user,
        })),
    ))
}

async fn logout(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> ApiResult<impl IntoResponse> {
    let config = &state.config.auth;
    if let Some(token) = session_token(&headers, &config.cookie_name) {
        state.auth.logout(&token)?;
    }
    Ok((
        [(SET_COOKIE, expired_cookie(config))],
        ApiResponse::message("Logged out successfully!"),
    ))
}

async fn check_auth(
    State(state): State<SharedState>,
    CurrentUser(session): CurrentUser,
) -> ApiResult<impl IntoResponse> {
    let user = state.auth.current_user(&session).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Authenticated user!",
        "user": user,
    })))
}

async fn send_otp(
    State(state): State<SharedState>,
    JsonBody(request): JsonBody<OtpRequest>,
) -> ApiResult<impl IntoResponse> {
    state.auth.send_otp(&request.email).await?;
    Ok(ApiResponse::message("OTP sent to email"))
}

async fn verify_otp(
    State(state): State<SharedState>,
    JsonBody(request): JsonBody<OtpRequest>,
) -> ApiResult<impl IntoResponse> {
    state.auth.verify_otp(&request.email, &request.otp).await?;
    Ok(ApiResponse::message("OTP verified successfully"))
}
