//! Image upload route
//!
//! Accepts a multipart `image` field and delegates storage to S3; the
//! response carries the public URL of the stored object. Storage failures
//! surface their raw message to the client.

use axum::{Json, extract::Multipart, extract::State, response::IntoResponse};
use serde_json::json;
use tracing::{error, info};

use crate::{error::ApiError, state::AppState, storage};

/// Upload a catalog image
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let extension = storage::image_extension(&file_name).ok_or_else(|| {
            ApiError::BadRequest(format!("Unsupported image format: {}", file_name))
        })?;
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;

        let url = state
            .image_store
            .upload_image(&extension, &content_type, data.to_vec())
            .await
            .map_err(|e| {
                error!("Image upload failed: {}", e);
                ApiError::BadRequest(e.to_string())
            })?;

        info!("Image uploaded: {}", url);

        return Ok(Json(json!({
            "message": "Image uploaded",
            "image": url,
        })));
    }

    Err(ApiError::BadRequest("No file uploaded".to_string()))
}
