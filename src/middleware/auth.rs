use crate::AppState;
use crate::api::error::AppError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

/// Validates the `Authorization: Bearer <token>` header against the static
/// allowlist loaded at startup. Pure check, no session state.
pub async fn auth_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization Header".to_string()))?;

    let (scheme, token) = header
        .split_once(' ')
        .map(|(s, t)| (s, t.trim()))
        .unwrap_or((header, ""));

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AppError::Unauthorized(
            "Invalid Authorization Scheme".to_string(),
        ));
    }

    if !state.config.valid_tokens.contains(token) {
        return Err(AppError::Forbidden("Invalid or Expired Token".to_string()));
    }

    Ok(next.run(req).await)
}
