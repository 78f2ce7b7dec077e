// handlers/categories.rs - /api/categories routes
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

use crate::database::models::{CategoryRequest, CategoryResponse};
use crate::error::ApiError;
use crate::services::CategoryService;

use super::AppState;

/// GET /api/categories
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryResponse>>, ApiError> {
    let service = CategoryService::new(state.pool.clone());
    Ok(Json(service.list().await?))
}

/// GET /api/categories/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CategoryResponse>, ApiError> {
    let service = CategoryService::new(state.pool.clone());
    Ok(Json(service.get(id).await?))
}

/// GET /api/categories/:id/children
pub async fn children(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<CategoryResponse>>, ApiError> {
    let service = CategoryService::new(state.pool.clone());
    Ok(Json(service.children(id).await?))
}

/// POST /api/categories
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CategoryRequest>,
) -> Result<(StatusCode, Json<CategoryResponse>), ApiError> {
    let service = CategoryService::new(state.pool.clone());
    let category = service.create(&request).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /api/categories/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<CategoryRequest>,
) -> Result<Json<CategoryResponse>, ApiError> {
    let service = CategoryService::new(state.pool.clone());
    Ok(Json(service.update(id, &request).await?))
}

/// DELETE /api/categories/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let service = CategoryService::new(state.pool.clone());
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
