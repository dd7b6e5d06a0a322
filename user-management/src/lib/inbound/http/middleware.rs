use axum::extract::Request;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde_json::json;

use crate::domain::user::models::UserId;
use crate::inbound::http::router::AppState;

/// Extension type to store the authenticated user id in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

/// Middleware that validates bearer tokens and records the caller's identity
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_token_from_header(&req)?;

    let claims: auth::Claims = state.authenticator.validate_token(token).map_err(|e| {
        tracing::warn!("JWT validation failed: {}", e);
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "message": "Invalid or expired token"
            })),
        )
            .into_response()
    })?;

    let user_id_str = claims.user_id().ok_or_else(|| {
        tracing::warn!("Missing 'id' claim in token");
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "message": "Invalid token format"
            })),
        )
            .into_response()
    })?;

    let user_id = user_id_str.parse::<i32>().map(UserId).map_err(|e| {
        tracing::warn!("Failed to parse user id from token: {}", e);
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "message": "Invalid token format"
            })),
        )
            .into_response()
    })?;

    req.extensions_mut().insert(AuthenticatedUser { user_id });

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, Response> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "message": "Missing Authorization header"
                })),
            )
                .into_response()
        })?;

    let auth_str = auth_header.to_str().map_err(|_| {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "message": "Invalid Authorization header"
            })),
        )
            .into_response()
    })?;

    if !auth_str.starts_with("Bearer ") {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "message": "Invalid Authorization header format. Expected: Bearer <token>"
            })),
        )
            .into_response());
    }

    Ok(auth_str.trim_start_matches("Bearer "))
}
