use axum::extract::Path;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::UserResponse;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::UserId;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    if body.id != id {
        return Err(ApiError::BadRequest(
            "Id in URL does not match id in request body.".to_string(),
        ));
    }

    let command = body.try_into_command().map_err(ApiError::from)?;

    state
        .user_service
        .update_user(UserId(id), command)
        .await
        .map_err(ApiError::from)
        .map(|ref user| Json(user.into()))
}

/// HTTP request body for updating a user (raw JSON)
///
/// Every field except the id is optional; omitted fields keep their stored
/// values.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub id: i32,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub age: Option<i32>,
    pub country: Option<String>,
    pub province: Option<String>,
    pub city: Option<String>,
    pub email: Option<String>,
}

impl UpdateUserRequest {
    fn try_into_command(self) -> Result<UpdateUserCommand, UserError> {
        let email = self.email.map(EmailAddress::new).transpose()?;

        Ok(UpdateUserCommand {
            first_name: self.first_name,
            last_name: self.last_name,
            age: self.age,
            country: self.country,
            province: self.province,
            city: self.city,
            email,
        })
    }
}
