use axum::extract::State;
use axum::http::header;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::UserResponse;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let command = body.try_into_command().map_err(ApiError::from)?;

    let user = state
        .user_service
        .create_user(command)
        .await
        .map_err(ApiError::from)?;

    let location = format!("/api/user/{}", user.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(UserResponse::from(&user)),
    ))
}

/// HTTP request body for creating a user (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    pub country: String,
    pub province: String,
    pub city: String,
    pub email: String,
    pub password: String,
}

impl CreateUserRequest {
    pub(super) fn try_into_command(self) -> Result<CreateUserCommand, UserError> {
        let email = EmailAddress::new(self.email)?;
        Ok(CreateUserCommand {
            first_name: self.first_name,
            last_name: self.last_name,
            age: self.age,
            country: self.country,
            province: self.province,
            city: self.city,
            email,
            password: self.password,
        })
    }
}
