//! `/api/admin/products`: catalog management and image upload.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde_json::json;
use shop_commerce::prelude::*;
use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};
use crate::extract::{AdminUser, JsonBody};
use crate::response::ApiResponse;
use crate::state::SharedState;

/// Multipart field carrying the image.
const UPLOAD_FIELD: &str = "my_file";

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/upload-image", post(upload_image))
        .route("/add", post(add_product))
        .route("/edit/:id", put(edit_product))
        .route("/delete/:id", delete(delete_product))
        .route("/get", get(list_products))
}

/// File extension for an upload, from its name or content type.
fn upload_extension(file_name: Option<&str>, content_type: Option<&str>) -> &'static str {
    let from_name = file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase());
    let ext = from_name.as_deref().or_else(|| content_type?.strip_prefix("image/"));
    match ext {
        Some("jpg" | "jpeg") => "jpg",
        Some("png") => "png",
        Some("gif") => "gif",
        Some("webp") => "webp",
        Some("svg" | "svg+xml") => "svg",
        Some("avif") => "avif",
        _ => "bin",
    }
}

async fn upload_image(
    State(state): State<SharedState>,
    _admin: AdminUser,
    mut multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.body_text()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let content_type = field.content_type().map(str::to_string);
        if let Some(ct) = &content_type {
            if !ct.starts_with("image/") && ct != "application/octet-stream" {
                return Err(ApiError::bad_request(format!("Unsupported file type: {ct}")));
            }
        }
        let ext = upload_extension(field.file_name(), content_type.as_deref());
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;
        if bytes.is_empty() {
            return Err(ApiError::bad_request("Uploaded file is empty"));
        }

        let server = &state.config.server;
        let file_name = format!("{}.{ext}", uuid::Uuid::new_v4().simple());
        tokio::fs::create_dir_all(&server.upload_dir).await?;
        tokio::fs::write(server.upload_dir.join(&file_name), &bytes).await?;

        let url = server.upload_url(&file_name);
        info!(file = %file_name, size = bytes.len(), "image uploaded");
        return Ok(Json(json!({
            "success": true,
            "result": { "url": url, "fileName": file_name, "bytes": bytes.len() },
        })));
    }

    Err(ApiError::bad_request(format!(
        "Missing multipart field `{UPLOAD_FIELD}`"
    )))
}

async fn add_product(
    State(state): State<SharedState>,
    _admin: AdminUser,
    JsonBody(draft): JsonBody<ProductDraft>,
) -> ApiResult<impl IntoResponse> {
    let product = Product::from_draft(&draft, state.currency)?;
    state.products.insert(&product).await?;
    info!(product_id = %product.id, title = %product.title, "product added");
    Ok((StatusCode::CREATED, ApiResponse::ok(product)))
}

async fn edit_product(
    State(state): State<SharedState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    JsonBody(draft): JsonBody<ProductDraft>,
) -> ApiResult<impl IntoResponse> {
    let _inventory = state.inventory.lock().await;
    let mut product = state
        .products
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product not found"))?;
    product.apply_draft(&draft)?;
    state.products.save(&product).await?;
    debug!(product_id = %product.id, "product updated");
    Ok(ApiResponse::ok(product))
}

async fn delete_product(
    State(state): State<SharedState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    if !state.products.delete(&id).await? {
        return Err(ApiError::not_found("Product not found"));
    }
    info!(product_id = %id, "product deleted");
    Ok(ApiResponse::message("Product deleted successfully"))
}

async fn list_products(
    State(state): State<SharedState>,
    _admin: AdminUser,
) -> ApiResult<impl IntoResponse> {
    Ok(ApiResponse::ok(state.products.all().await?))
}
