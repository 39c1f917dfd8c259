//! `/api/common/feature`: home page banner images.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::Router;
use serde::Deserialize;
use shop_commerce::prelude::*;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::extract::{AdminUser, JsonBody};
use crate::response::ApiResponse;
use crate::state::SharedState;

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/add", post(add_feature_image))
        .route("/get", get(list_feature_images))
        .route("/delete/:id", delete(delete_feature_image))
}

#[derive(Debug, Deserialize)]
struct NewFeatureImage {
    #[serde(default)]
    image: String,
}

async fn add_feature_image(
    State(state): State<SharedState>,
    _admin: AdminUser,
    JsonBody(request): JsonBody<NewFeatureImage>,
) -> ApiResult<impl IntoResponse> {
    let feature = FeatureImage::new(request.image)?;
    state.features.insert(&feature).await?;
    info!(feature_id = %feature.id, "feature image added");
    Ok((StatusCode::CREATED, ApiResponse::ok(feature)))
}

async fn list_feature_images(State(state): State<SharedState>) -> ApiResult<impl IntoResponse> {
    Ok(ApiResponse::ok(state.features.all().await?))
}

async fn delete_feature_image(
    State(state): State<SharedState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    if !state.features.delete(&id).await? {
        return Err(ApiError::not_found("Feature image not found"));
    }
    Ok(ApiResponse::message("Feature image deleted"))
}
