// handlers/organizations.rs - /api/organizations routes
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::database::models::{OrganizationRequest, OrganizationResponse};
use crate::error::ApiError;
use crate::messaging::DomainEvent;
use crate::services::OrganizationService;

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub name: String,
}

/// GET /api/organizations
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<Vec<OrganizationResponse>>, ApiError> {
    let service = OrganizationService::new(state.pool.clone());
    Ok(Json(service.list().await?))
}

/// GET /api/organizations/search?name= - case-insensitive substring search
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<OrganizationResponse>>, ApiError> {
    let service = OrganizationService::new(state.pool.clone());
    Ok(Json(service.search_by_name(&query.name).await?))
}

/// GET /api/organizations/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<OrganizationResponse>, ApiError> {
    let service = OrganizationService::new(state.pool.clone());
    Ok(Json(service.get(id).await?))
}

/// GET /api/organizations/tax/:tax_id
pub async fn get_by_tax_id(
    State(state): State<AppState>,
    Path(tax_id): Path<String>,
) -> Result<Json<OrganizationResponse>, ApiError> {
    let service = OrganizationService::new(state.pool.clone());
    Ok(Json(service.get_by_tax_id(&tax_id).await?))
}

/// POST /api/organizations
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<OrganizationRequest>,
) -> Result<(StatusCode, Json<OrganizationResponse>), ApiError> {
    let service = OrganizationService::new(state.pool.clone());
    let organization = service.create(&request).await?;

    if let Some(publisher) = &state.publisher {
        publisher
            .publish_best_effort(DomainEvent::new(
                "organization.created",
                json!({"id": organization.id, "name": organization.name}),
            ))
            .await;
    }

    Ok((StatusCode::CREATED, Json(organization)))
}

/// PUT /api/organizations/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<OrganizationRequest>,
) -> Result<Json<OrganizationResponse>, ApiError> {
    let service = OrganizationService::new(state.pool.clone());
    let organization = service.update(id, &request).await?;

    if let Some(publisher) = &state.publisher {
        publisher
            .publish_best_effort(DomainEvent::new("organization.updated", json!({"id": id})))
            .await;
    }

    Ok(Json(organization))
}

/// DELETE /api/organizations/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let service = OrganizationService::new(state.pool.clone());
    service.delete(id).await?;

    if let Some(publisher) = &state.publisher {
        publisher
            .publish_best_effort(DomainEvent::new("organization.deleted", json!({"id": id})))
            .await;
    }

    Ok(StatusCode::NO_CONTENT)
}
