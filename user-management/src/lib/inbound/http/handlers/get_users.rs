use axum::extract::Query;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::UserResponse;
use crate::domain::user::models::ListUsersQuery;
use crate::domain::user::models::PaginatedResult;
use crate::domain::user::models::User;
use crate::inbound::http::router::AppState;

pub async fn get_users(
    State(state): State<AppState>,
    Query(params): Query<ListUsersParams>,
) -> Result<Json<PaginatedResponse>, ApiError> {
    let page = state
        .user_service
        .list_users(ListUsersQuery {
            page: params.page,
            page_size: params.page_size,
            age: params.age,
            country: params.country,
        })
        .await
        .map_err(ApiError::from)?;

    Ok(Json((&page).into()))
}

/// Query parameters for the listing endpoint (raw, store-defined bounds)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersParams {
    #[serde(default = "default_page")]
    pub page: i32,
    #[serde(default = "default_page_size")]
    pub page_size: i32,
    pub age: Option<i32>,
    pub country: Option<String>,
}

fn default_page() -> i32 {
    1
}

fn default_page_size() -> i32 {
    10
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse {
    pub items: Vec<UserResponse>,
    pub page: i32,
    pub page_size: i32,
    pub total_pages: i32,
    pub total_count: i32,
}

impl From<&PaginatedResult<User>> for PaginatedResponse {
    fn from(page: &PaginatedResult<User>) -> Self {
        Self {
            items: page.items.iter().map(UserResponse::from).collect(),
            page: page.page,
            page_size: page.page_size,
            total_pages: page.total_pages,
            total_count: page.total_count,
        }
    }
}
