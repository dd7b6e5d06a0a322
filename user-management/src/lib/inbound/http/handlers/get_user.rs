use axum::extract::Path;
use axum::extract::State;
use axum::Json;

use super::ApiError;
use super::UserResponse;
use crate::domain::user::models::UserId;
use crate::inbound::http::router::AppState;

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<UserResponse>, ApiError> {
    state
        .user_service
        .get_user(UserId(id))
        .await
        .map_err(ApiError::from)
        .map(|ref user| Json(user.into()))
}
