use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Relational account used for API login; distinct from the Cognito-backed
/// directory users.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Role {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRequest {
    pub username: String,
    pub password: Option<String>,
    pub email: Option<String>,
    pub role_ids: Option<Vec<i64>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub roles: Vec<Role>,
}

impl AccountResponse {
    pub fn from_parts(user: User, roles: Vec<Role>) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            roles,
        }
    }
}
