// handlers/directory_users.rs - /api/cognito/users routes
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};

use crate::directory::{DirectoryUser, UserRequest};
use crate::error::ApiError;
use crate::listing::PagedResponse;

use super::{AppState, ListQuery};

/// GET /api/cognito/users - paginated, filterable, sortable listing
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<PagedResponse<DirectoryUser>>, ApiError> {
    let params = query.into_params();
    Ok(Json(state.users.list_users(&params).await?))
}

/// GET /api/cognito/users/:username
pub async fn get(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<DirectoryUser>, ApiError> {
    Ok(Json(state.users.get_user(&username).await?))
}

/// POST /api/cognito/users
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<UserRequest>,
) -> Result<(StatusCode, Json<DirectoryUser>), ApiError> {
    let user = state.users.create_user(&request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// PUT /api/cognito/users/:username - update user attributes
pub async fn update(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(request): Json<UserRequest>,
) -> Result<Json<DirectoryUser>, ApiError> {
    Ok(Json(state.users.update_user(&username, &request).await?))
}

/// DELETE /api/cognito/users/:username
pub async fn delete(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.users.delete_user(&username).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/cognito/users/:username/enable
pub async fn enable(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<DirectoryUser>, ApiError> {
    Ok(Json(state.users.enable_user(&username).await?))
}

/// POST /api/cognito/users/:username/disable
pub async fn disable(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<DirectoryUser>, ApiError> {
    Ok(Json(state.users.disable_user(&username).await?))
}

/// POST /api/cognito/users/:username/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.users.reset_password(&username).await?;
    Ok(Json(json!({
        "username": username,
        "message": "Password reset initiated"
    })))
}

/// GET /api/cognito/users/:username/groups
pub async fn groups(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.users.user_groups(&username).await?))
}

/// POST /api/cognito/users/:username/groups/:group_name
pub async fn add_to_group(
    State(state): State<AppState>,
    Path((username, group_name)): Path<(String, String)>,
) -> Result<Json<DirectoryUser>, ApiError> {
    Ok(Json(state.users.add_user_to_group(&username, &group_name).await?))
}

/// DELETE /api/cognito/users/:username/groups/:group_name
pub async fn remove_from_group(
    State(state): State<AppState>,
    Path((username, group_name)): Path<(String, String)>,
) -> Result<Json<DirectoryUser>, ApiError> {
    Ok(Json(state.users.remove_user_from_group(&username, &group_name).await?))
}
