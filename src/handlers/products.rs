// handlers/products.rs - /api/products routes
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use crate::database::models::{ProductRequest, ProductResponse};
use crate::error::ApiError;
use crate::messaging::DomainEvent;
use crate::services::ProductService;

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct PriceQuery {
    pub price: Decimal,
}

/// GET /api/products
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let service = ProductService::new(state.pool.clone());
    Ok(Json(service.list().await?))
}

/// GET /api/products/search?name= - case-insensitive substring search
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let service = ProductService::new(state.pool.clone());
    Ok(Json(service.search_by_name(&query.name).await?))
}

/// GET /api/products/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ProductResponse>, ApiError> {
    let service = ProductService::new(state.pool.clone());
    Ok(Json(service.get(id).await?))
}

/// GET /api/products/under-price?price=
pub async fn under_price(
    State(state): State<AppState>,
    Query(query): Query<PriceQuery>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let service = ProductService::new(state.pool.clone());
    Ok(Json(service.under_price(query.price).await?))
}

/// GET /api/products/in-stock
pub async fn in_stock(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let service = ProductService::new(state.pool.clone());
    Ok(Json(service.in_stock().await?))
}

/// POST /api/products
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<ProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    let service = ProductService::new(state.pool.clone());
    let product = service.create(&request).await?;

    if let Some(publisher) = &state.publisher {
        publisher
            .publish_best_effort(DomainEvent::new(
                "product.created",
                json!({"id": product.id, "name": product.name}),
            ))
            .await;
    }

    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /api/products/:id - partial update
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<ProductRequest>,
) -> Result<Json<ProductResponse>, ApiError> {
    let service = ProductService::new(state.pool.clone());
    let product = service.update(id, &request).await?;

    if let Some(publisher) = &state.publisher {
        publisher
            .publish_best_effort(DomainEvent::new("product.updated", json!({"id": id})))
            .await;
    }

    Ok(Json(product))
}

/// DELETE /api/products/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let service = ProductService::new(state.pool.clone());
    service.delete(id).await?;

    if let Some(publisher) = &state.publisher {
        publisher
            .publish_best_effort(DomainEvent::new("product.deleted", json!({"id": id})))
            .await;
    }

    Ok(StatusCode::NO_CONTENT)
}
