// handlers/accounts.rs - /api/users routes (local relational accounts)
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};

use crate::database::models::{AccountRequest, AccountResponse};
use crate::error::ApiError;
use crate::services::AccountService;

use super::AppState;

/// GET /api/users
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<Vec<AccountResponse>>, ApiError> {
    let service = AccountService::new(state.pool.clone());
    Ok(Json(service.list().await?))
}

/// GET /api/users/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<AccountResponse>, ApiError> {
    let service = AccountService::new(state.pool.clone());
    Ok(Json(service.get(id).await?))
}

/// GET /api/users/username/:username
pub async fn get_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<AccountResponse>, ApiError> {
    let service = AccountService::new(state.pool.clone());
    Ok(Json(service.get_by_username(&username).await?))
}

/// GET /api/users/exists/:username
pub async fn exists(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let service = AccountService::new(state.pool.clone());
    let exists = service.exists(&username).await?;
    Ok(Json(json!({"username": username, "exists": exists})))
}

/// POST /api/users
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<AccountRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), ApiError> {
    let service = AccountService::new(state.pool.clone());
    let account = service.create(&request).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// PUT /api/users/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<AccountRequest>,
) -> Result<Json<AccountResponse>, ApiError> {
    let service = AccountService::new(state.pool.clone());
    Ok(Json(service.update(id, &request).await?))
}

/// DELETE /api/users/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let service = AccountService::new(state.pool.clone());
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
