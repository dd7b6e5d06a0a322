use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use super::create_user::CreateUserRequest;
use super::ApiError;
use super::UserResponse;
use crate::domain::user::service::MAX_BULK_USERS;
use crate::inbound::http::router::AppState;

pub async fn create_users(
    State(state): State<AppState>,
    Json(body): Json<CreateUsersRequest>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    // Bounded here before any parsing; the service enforces the same bound
    // before persisting.
    let count = body.users.len();
    if count == 0 || count > MAX_BULK_USERS {
        return Err(ApiError::BadRequest(
            "Invalid number of users. Must be between 1 and 1000.".to_string(),
        ));
    }

    let commands = body
        .users
        .into_iter()
        .map(|user| user.try_into_command())
        .collect::<Result<Vec<_>, _>>()
        .map_err(ApiError::from)?;

    let users = state
        .user_service
        .create_users(commands)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

/// HTTP request body for the bulk-create endpoint (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateUsersRequest {
    pub users: Vec<CreateUserRequest>,
}
