use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    // Unknown email and wrong password produce the same outcome, so a caller
    // cannot probe which addresses are registered.
    let user = match state.user_service.get_user_by_email(&body.email).await {
        Ok(user) => user,
        Err(UserError::NotFoundByEmail(_)) => return Err(invalid_credentials()),
        Err(e) => return Err(ApiError::from(e)),
    };

    let password_matches = state
        .authenticator
        .validate_password(&body.password, &user.password_hash)
        .map_err(|e| {
            ApiError::InternalServerError(format!("Password verification failed: {}", e))
        })?;

    if !password_matches {
        return Err(invalid_credentials());
    }

    let claims = auth::Claims::for_user(user.id, state.jwt_expiration_minutes);
    let token = state
        .authenticator
        .generate_token(&claims)
        .map_err(|e| ApiError::InternalServerError(format!("Token generation failed: {}", e)))?;

    Ok(Json(LoginResponse { token }))
}

fn invalid_credentials() -> ApiError {
    ApiError::BadRequest("Invalid email or password".to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponse {
    pub token: String,
}
