// handlers/health.rs - GET / and GET /health
use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::database;

use super::AppState;

/// Service banner with the route map.
pub async fn root() -> Json<Value> {
    Json(json!({
        "name": "eb2c API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health (public)",
            "auth": "/auth/login (public)",
            "organizations": "/api/organizations[/:id], /api/organizations/search?name=, /api/organizations/tax/:tax_id",
            "products": "/api/products[/:id], /api/products/search?name=, /api/products/under-price?price=, /api/products/in-stock",
            "categories": "/api/categories[/:id], /api/categories/:id/children",
            "users": "/api/users[/:id], /api/users/username/:username, /api/users/exists/:username",
            "directory_users": "/api/cognito/users[/:username] (paged listing: page, size, sortBy, sortDirection, filter)",
            "directory_groups": "/api/groups[/:group_name] (paged listing: page, size, sortBy, sortDirection, filter)",
        }
    }))
}

/// Liveness probe that also reports database reachability.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let database = match database::health_check(&state.pool).await {
        Ok(()) => "up",
        Err(_) => "down",
    };

    Json(json!({
        "status": "ok",
        "database": database,
    }))
}
