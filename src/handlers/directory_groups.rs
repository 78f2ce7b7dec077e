// handlers/directory_groups.rs - /api/groups routes
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};

use crate::directory::{DirectoryGroup, GroupRequest};
use crate::error::ApiError;
use crate::listing::PagedResponse;

use super::{AppState, ListQuery};

/// GET /api/groups - paginated, filterable, sortable listing
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<PagedResponse<DirectoryGroup>>, ApiError> {
    let params = query.into_params();
    Ok(Json(state.groups.list_groups(&params).await?))
}

/// GET /api/groups/:group_name
pub async fn get(
    State(state): State<AppState>,
    Path(group_name): Path<String>,
) -> Result<Json<DirectoryGroup>, ApiError> {
    Ok(Json(state.groups.get_group(&group_name).await?))
}

/// POST /api/groups
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<GroupRequest>,
) -> Result<(StatusCode, Json<DirectoryGroup>), ApiError> {
    let group = state.groups.create_group(&request).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

/// PUT /api/groups/:group_name
pub async fn update(
    State(state): State<AppState>,
    Path(group_name): Path<String>,
    Json(request): Json<GroupRequest>,
) -> Result<Json<DirectoryGroup>, ApiError> {
    Ok(Json(state.groups.update_group(&group_name, &request).await?))
}

/// DELETE /api/groups/:group_name
pub async fn delete(
    State(state): State<AppState>,
    Path(group_name): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.groups.delete_group(&group_name).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/groups/:group_name/users - member usernames
pub async fn users(
    State(state): State<AppState>,
    Path(group_name): Path<String>,
) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.groups.group_users(&group_name).await?))
}

/// POST /api/groups/:group_name/users/:username
pub async fn add_user(
    State(state): State<AppState>,
    Path((group_name, username)): Path<(String, String)>,
) -> Result<Json<DirectoryGroup>, ApiError> {
    Ok(Json(state.groups.add_user_to_group(&group_name, &username).await?))
}

/// DELETE /api/groups/:group_name/users/:username
pub async fn remove_user(
    State(state): State<AppState>,
    Path((group_name, username)): Path<(String, String)>,
) -> Result<Json<DirectoryGroup>, ApiError> {
    Ok(Json(state.groups.remove_user_from_group(&group_name, &username).await?))
}
