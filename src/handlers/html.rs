use crate::AppState;
use crate::api::error::AppError;
use crate::services::naming;
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct HtmlRequest {
    pub html_content: String,
    pub filename: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct HtmlResponse {
    pub success: bool,
    pub html_url: String,
    pub local_url: String,
    pub filename: String,
}

#[utoipa::path(
    post,
    path = "/generate-html/",
    request_body = HtmlRequest,
    responses(
        (status = 200, description = "HTML persisted and published", body = HtmlResponse),
        (status = 401, description = "Missing or malformed Authorization header"),
        (status = 403, description = "Token not recognized"),
        (status = 500, description = "Save or upload error")
    ),
    security(
        ("bearer" = [])
    )
)]
pub async fn generate_html(
    State(state): State<AppState>,
    Json(req): Json<HtmlRequest>,
) -> Result<Json<HtmlResponse>, AppError> {
    tracing::info!("Handling HTML publish request");
    let start = Instant::now();

    let filename = req
        .filename
        .unwrap_or_else(|| naming::generate_filename(naming::DEFAULT_EXTENSION));

    let path = state
        .html_store
        .save(req.html_content.as_bytes(), &filename)
        .await?;

    // Remote key is the bare filename, no directory prefix. On failure the
    // local artifact stays on disk; there is no reconciliation.
    let html_url = state
        .publisher
        .publish(&path, &filename)
        .await
        .ok_or_else(|| AppError::UploadFailed("Failed to upload HTML".to_string()))?;

    tracing::info!(
        "HTML published as {} in {:.2}s",
        filename,
        start.elapsed().as_secs_f64()
    );

    Ok(Json(HtmlResponse {
        success: true,
        html_url,
        local_url: state.config.local_html_url(&filename),
        filename,
    }))
}
