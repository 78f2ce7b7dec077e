use sqlx::PgPool;
use tracing::info;

use crate::services::ServiceError;

const ROLES: [&str; 2] = ["ADMIN", "USER"];

/// Seeds the default roles and two development accounts (admin/admin and
/// user/user). Safe to run repeatedly; existing rows are left untouched.
pub async fn seed(pool: &PgPool) -> Result<(), ServiceError> {
    for role in ROLES {
        sqlx::query("INSERT INTO roles (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
            .bind(role)
            .execute(pool)
            .await?;
    }

    seed_account(pool, "admin", &["ADMIN", "USER"]).await?;
    seed_account(pool, "user", &["USER"]).await?;

    Ok(())
}

async fn seed_account(pool: &PgPool, username: &str, roles: &[&str]) -> Result<(), ServiceError> {
    let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await?;
    if existing.is_some() {
        return Ok(());
    }

    // Development seed data only; the password matches the username.
    let password_hash = bcrypt::hash(username, bcrypt::DEFAULT_COST)?;
    let user_id: i64 = sqlx::query_scalar(
        "INSERT INTO users (username, password_hash) VALUES ($1, $2) RETURNING id",
    )
    .bind(username)
    .bind(&password_hash)
    .fetch_one(pool)
    .await?;

    for role in roles {
        sqlx::query(
            "INSERT INTO user_roles (user_id, role_id) SELECT $1, id FROM roles WHERE name = $2",
        )
        .bind(user_id)
        .bind(role)
        .execute(pool)
        .await?;
    }

    info!("Seeded account '{}' with roles {:?}", username, roles);
    Ok(())
}
