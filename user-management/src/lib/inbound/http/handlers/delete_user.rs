use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use crate::domain::user::models::UserId;
use crate::inbound::http::router::AppState;

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state
        .user_service
        .delete_user(UserId(id))
        .await
        .map_err(ApiError::from)
        .map(|_| StatusCode::NO_CONTENT)
}
