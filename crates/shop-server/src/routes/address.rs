//! `/api/shop/address`: delivery addresses, at most a few per user.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use axum::Router;
use serde::Deserialize;
use shop_commerce::checkout::check_address_limit;
use shop_commerce::prelude::*;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::extract::{CurrentUser, JsonBody};
use crate::response::ApiResponse;
use crate::state::{AppState, SharedState};

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/add", post(add_address))
        .route("/get/:user_id", get(list_addresses))
        .route("/update/:user_id/:address_id", put(edit_address))
        .route("/delete/:user_id/:address_id", delete(remove_address))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewAddress {
    user_id: UserId,
    #[serde(flatten)]
    draft: AddressDraft,
}

/// The address, if it exists and belongs to `user_id`.
async fn owned_address(
    state: &AppState,
    user_id: &UserId,
    address_id: &str,
) -> ApiResult<Address> {
    state
        .addresses
        .get(address_id)
        .await?
        .filter(|a| &a.user_id == user_id)
        .ok_or_else(|| ApiError::not_found("Address not found"))
}

async fn add_address(
    State(state): State<SharedState>,
    user: CurrentUser,
    JsonBody(request): JsonBody<NewAddress>,
) -> ApiResult<impl IntoResponse> {
    user.ensure_owner(&request.user_id)?;
    let _guard = state.user_locks.lock(&request.user_id).await;
    let existing = state
        .addresses
        .find(|a| a.user_id == request.user_id)
        .await?;
    check_address_limit(existing.len())?;

    let address = Address::from_draft(request.user_id, &request.draft)?;
    state.addresses.insert(&address).await?;
    info!(address_id = %address.id, user_id = %address.user_id, "address added");
    Ok((StatusCode::CREATED, ApiResponse::ok(address)))
}

async fn list_addresses(
    State(state): State<SharedState>,
    user: CurrentUser,
    Path(user_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let user_id = UserId::new(user_id);
    user.ensure_owner(&user_id)?;
    let addresses = state.addresses.find(|a| a.user_id == user_id).await?;
    Ok(ApiResponse::ok(addresses))
}

async fn edit_address(
    State(state): State<SharedState>,
    user: CurrentUser,
    Path((user_id, address_id)): Path<(String, String)>,
    JsonBody(draft): JsonBody<AddressDraft>,
) -> ApiResult<impl IntoResponse> {
    let user_id = UserId::new(user_id);
    user.ensure_owner(&user_id)?;
    let mut address = owned_address(&state, &user_id, &address_id).await?;
    address.apply_draft(&draft)?;
    state.addresses.save(&address).await?;
    Ok(ApiResponse::ok(address).with_message("Address updated successfully"))
}

async fn remove_address(
    State(state): State<SharedState>,
    user: CurrentUser,
    Path((user_id, address_id)): Path<(String, String)>,
) -> ApiResult<impl IntoResponse> {
    let user_id = UserId::new(user_id);
    user.ensure_owner(&user_id)?;
    let address = owned_address(&state, &user_id, &address_id).await?;
    state.addresses.delete(address.id.as_str()).await?;
    Ok(ApiResponse::message("Address deleted successfully"))
}
