use sqlx::PgPool;

use crate::database::models::{AccountRequest, AccountResponse, Role, User};
use crate::services::ServiceError;

/// Local account management backed by the relational store. Passwords are
/// stored as bcrypt hashes; roles are attached through a join table.
pub struct AccountService {
    pool: PgPool,
}

impl AccountService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, request: &AccountRequest) -> Result<AccountResponse, ServiceError> {
        let password = validate_new_account(request)?;

        if self.exists(&request.username).await? {
            return Err(username_taken(&request.username));
        }

        let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)?;

        let mut tx = self.pool.begin().await?;
        let user = sqlx::query_as::<_, User>(
            r#"INSERT INTO users (username, password_hash, email)
               VALUES ($1, $2, $3)
               RETURNING id, username, password_hash, email"#,
        )
        .bind(&request.username)
        .bind(&password_hash)
        .bind(&request.email)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(role_ids) = &request.role_ids {
            for role_id in role_ids {
                let attached = sqlx::query(
                    r#"INSERT INTO user_roles (user_id, role_id)
                       SELECT $1, id FROM roles WHERE id = $2"#,
                )
                .bind(user.id)
                .bind(role_id)
                .execute(&mut *tx)
                .await?;

                if attached.rows_affected() == 0 {
                    return Err(ServiceError::NotFound(format!("Role not found: {}", role_id)));
                }
            }
        }
        tx.commit().await?;

        let roles = self.roles_of(user.id).await?;
        Ok(AccountResponse::from_parts(user, roles))
    }

    pub async fn get(&self, id: i64) -> Result<AccountResponse, ServiceError> {
        let user = self.fetch(id).await?;
        let roles = self.roles_of(user.id).await?;
        Ok(AccountResponse::from_parts(user, roles))
    }

    pub async fn get_by_username(&self, username: &str) -> Result<AccountResponse, ServiceError> {
        let user = self
            .fetch_by_username(username)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User not found: {}", username)))?;
        let roles = self.roles_of(user.id).await?;
        Ok(AccountResponse::from_parts(user, roles))
    }

    pub async fn list(&self) -> Result<Vec<AccountResponse>, ServiceError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, email FROM users ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut responses = Vec::with_capacity(users.len());
        for user in users {
            let roles = self.roles_of(user.id).await?;
            responses.push(AccountResponse::from_parts(user, roles));
        }
        Ok(responses)
    }

    pub async fn exists(&self, username: &str) -> Result<bool, ServiceError> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    /// Updates username and email, re-hashes the password when one is
    /// provided, and replaces the role set when role ids are present.
    pub async fn update(&self, id: i64, request: &AccountRequest) -> Result<AccountResponse, ServiceError> {
        let existing = self.fetch(id).await?;

        if request.username != existing.username && self.exists(&request.username).await? {
            return Err(username_taken(&request.username));
        }

        let password_hash = password_hash_for_update(request, existing.password_hash)?;

        let mut tx = self.pool.begin().await?;
        let user = sqlx::query_as::<_, User>(
            r#"UPDATE users SET username = $2, password_hash = $3, email = $4
               WHERE id = $1
               RETURNING id, username, password_hash, email"#,
        )
        .bind(id)
        .bind(&request.username)
        .bind(&password_hash)
        .bind(&request.email)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(role_ids) = &request.role_ids {
            sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            for role_id in role_ids {
                let attached = sqlx::query(
                    r#"INSERT INTO user_roles (user_id, role_id)
                       SELECT $1, id FROM roles WHERE id = $2"#,
                )
                .bind(id)
                .bind(role_id)
                .execute(&mut *tx)
                .await?;

                if attached.rows_affected() == 0 {
                    return Err(ServiceError::NotFound(format!("Role not found: {}", role_id)));
                }
            }
        }
        tx.commit().await?;

        let roles = self.roles_of(id).await?;
        Ok(AccountResponse::from_parts(user, roles))
    }

    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound(format!("User not found: {}", id)));
        }
        Ok(())
    }

    /// Checks a username/password pair and returns the account with its
    /// roles on success. Unknown usernames and wrong passwords produce the
    /// same error so callers cannot distinguish the two.
    pub async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(User, Vec<Role>), ServiceError> {
        let invalid = || ServiceError::Invalid("Invalid username or password".to_string());

        let user = self.fetch_by_username(username).await?.ok_or_else(invalid)?;
        if !bcrypt::verify(password, &user.password_hash)? {
            return Err(invalid());
        }

        let roles = self.roles_of(user.id).await?;
        Ok((user, roles))
    }

    async fn fetch(&self, id: i64) -> Result<User, ServiceError> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, email FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("User not found: {}", id)))
    }

    async fn fetch_by_username(&self, username: &str) -> Result<Option<User>, ServiceError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, email FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn roles_of(&self, user_id: i64) -> Result<Vec<Role>, ServiceError> {
        let roles = sqlx::query_as::<_, Role>(
            r#"SELECT r.id, r.name FROM roles r
               JOIN user_roles ur ON ur.role_id = r.id
               WHERE ur.user_id = $1
               ORDER BY r.id"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(roles)
    }
}

/// New accounts need a non-blank username and a non-empty password. Returns
/// the password so the caller can hash it.
fn validate_new_account(request: &AccountRequest) -> Result<&str, ServiceError> {
    if request.username.trim().is_empty() {
        return Err(ServiceError::Invalid("Username is required".to_string()));
    }
    request
        .password
        .as_deref()
        .filter(|password| !password.is_empty())
        .ok_or_else(|| ServiceError::Invalid("Password is required".to_string()))
}

/// The password is re-hashed only when the update carries a new non-empty
/// one; otherwise the stored hash survives unchanged.
fn password_hash_for_update(
    request: &AccountRequest,
    existing_hash: String,
) -> Result<String, ServiceError> {
    match request.password.as_deref().filter(|p| !p.is_empty()) {
        Some(password) => Ok(bcrypt::hash(password, bcrypt::DEFAULT_COST)?),
        None => Ok(existing_hash),
    }
}

fn username_taken(username: &str) -> ServiceError {
    ServiceError::Conflict(format!("Username already taken: {}", username))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(username: &str, password: Option<&str>) -> AccountRequest {
        AccountRequest {
            username: username.to_string(),
            password: password.map(str::to_string),
            email: None,
            role_ids: None,
        }
    }

    #[test]
    fn new_account_requires_username_and_password() {
        let err = validate_new_account(&request("  ", Some("secret"))).unwrap_err();
        assert!(matches!(err, ServiceError::Invalid(ref m) if m == "Username is required"));

        let err = validate_new_account(&request("jdoe", None)).unwrap_err();
        assert!(matches!(err, ServiceError::Invalid(ref m) if m == "Password is required"));

        let err = validate_new_account(&request("jdoe", Some(""))).unwrap_err();
        assert!(matches!(err, ServiceError::Invalid(ref m) if m == "Password is required"));

        assert_eq!(validate_new_account(&request("jdoe", Some("secret"))).unwrap(), "secret");
    }

    #[test]
    fn update_keeps_stored_hash_when_no_password_given() {
        let stored = "stored-hash".to_string();

        let hash = password_hash_for_update(&request("jdoe", None), stored.clone()).unwrap();
        assert_eq!(hash, stored);

        let hash = password_hash_for_update(&request("jdoe", Some("")), stored.clone()).unwrap();
        assert_eq!(hash, stored);
    }

    #[test]
    fn update_rehashes_when_a_new_password_is_given() {
        let stored = bcrypt::hash("old-secret", 4).unwrap();

        let hash =
            password_hash_for_update(&request("jdoe", Some("new-secret")), stored.clone()).unwrap();
        assert_ne!(hash, stored);
        assert!(bcrypt::verify("new-secret", &hash).unwrap());
        assert!(!bcrypt::verify("old-secret", &hash).unwrap());
    }

    #[test]
    fn duplicate_usernames_conflict() {
        let err = username_taken("jdoe");
        assert!(matches!(err, ServiceError::Conflict(ref m) if m == "Username already taken: jdoe"));
    }
}
