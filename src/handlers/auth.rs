// handlers/auth.rs - POST /auth/login
use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};

use crate::auth::{generate_jwt, Claims};
use crate::config;
use crate::database::models::AccountResponse;
use crate::error::ApiError;
use crate::services::AccountService;

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: AccountResponse,
    pub expires_in: i64,
}

/// Authenticate against the local account store and issue a JWT.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    if request.username.trim().is_empty() || request.password.is_empty() {
        return Err(ApiError::bad_request("Username and password are required"));
    }

    let service = AccountService::new(state.pool.clone());
    let (user, roles) = service
        .verify_credentials(&request.username, &request.password)
        .await
        .map_err(|e| match e {
            crate::services::ServiceError::Invalid(msg) => ApiError::unauthorized(msg),
            other => other.into(),
        })?;

    let role_names: Vec<String> = roles.iter().map(|r| r.name.clone()).collect();
    let claims = Claims::new(user.username.clone(), user.id, user.email.clone(), role_names);
    let token = generate_jwt(claims)
        .map_err(|e| ApiError::internal_server_error(format!("Token generation failed: {}", e)))?;

    let expires_in = config::config().security.jwt_expiry_hours as i64 * 3600;

    Ok(Json(LoginResponse {
        token,
        user: AccountResponse::from_parts(user, roles),
        expires_in,
    }))
}
