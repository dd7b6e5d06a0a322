use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::user::errors::UserError;
use crate::user::models::User;

pub mod create_user;
pub mod create_users;
pub mod delete_user;
pub mod get_user;
pub mod get_users;
pub mod login;
pub mod update_user;

/// Error surfaced to HTTP clients as a status code plus a message body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    InternalServerError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(ApiErrorBody { message })).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) | UserError::NotFoundByEmail(_) => {
                ApiError::NotFound(err.to_string())
            }
            UserError::InvalidEmail(_) | UserError::InvalidBatchSize(_) => {
                ApiError::BadRequest(err.to_string())
            }
            UserError::DatabaseError(_) | UserError::Unknown(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorBody {
    pub message: String,
}

/// Wire representation of a user, shared by every user endpoint.
///
/// Serializes the full entity the way the store holds it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    pub country: String,
    pub province: String,
    pub city: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.0,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            age: user.age,
            country: user.country.clone(),
            province: user.province.clone(),
            city: user.city.clone(),
            email: user.email.as_str().to_string(),
            password_hash: user.password_hash.clone(),
            created_at: user.created_at,
            deleted_at: user.deleted_at,
        }
    }
}
