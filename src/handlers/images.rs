use crate::AppState;
use crate::api::error::AppError;
use crate::services::fetcher;
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct ImageRequest {
    pub file_url: String,
    pub filename: String,
}

#[derive(Serialize, ToSchema)]
pub struct ImageResponse {
    pub success: bool,
    /// Public URL of the published image (field name kept for wire
    /// compatibility with existing clients).
    pub local_url: String,
    pub filename: String,
}

#[utoipa::path(
    post,
    path = "/upload-image/",
    request_body = ImageRequest,
    responses(
        (status = 200, description = "Image fetched, persisted and published", body = ImageResponse),
        (status = 400, description = "Source URL could not be downloaded"),
        (status = 401, description = "Missing or malformed Authorization header"),
        (status = 403, description = "Token not recognized"),
        (status = 500, description = "Save or upload error")
    ),
    security(
        ("bearer" = [])
    )
)]
pub async fn upload_image(
    State(state): State<AppState>,
    Json(req): Json<ImageRequest>,
) -> Result<Json<ImageResponse>, AppError> {
    let start = Instant::now();

    let image_data = fetcher::fetch_bytes(&state.http_client, &req.file_url)
        .await
        .ok_or_else(|| {
            AppError::BadRequest("Failed to download image from URL".to_string())
        })?;

    let path = state.image_store.save(&image_data, &req.filename).await?;

    let remote_key = format!("images/{}", req.filename);
    let image_url = state
        .publisher
        .publish(&path, &remote_key)
        .await
        .ok_or_else(|| AppError::UploadFailed("Failed to upload image".to_string()))?;

    tracing::info!(
        "Image {} published in {:.2}s",
        req.filename,
        start.elapsed().as_secs_f64()
    );

    Ok(Json(ImageResponse {
        success: true,
        local_url: image_url,
        filename: req.filename,
    }))
}
