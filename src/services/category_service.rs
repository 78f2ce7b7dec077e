use sqlx::PgPool;

use crate::database::models::{Category, CategoryRequest, CategoryResponse};
use crate::services::ServiceError;

/// Category tree operations. Names are unique; a category may reference a
/// parent category to form a hierarchy.
pub struct CategoryService {
    pool: PgPool,
}

impl CategoryService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, request: &CategoryRequest) -> Result<CategoryResponse, ServiceError> {
        if request.name.trim().is_empty() {
            return Err(ServiceError::Invalid("Category name is required".to_string()));
        }

        if let Some(parent_id) = request.parent_id {
            self.fetch(parent_id).await?;
        }

        let category = sqlx::query_as::<_, Category>(
            r#"INSERT INTO categories (name, parent_id)
               VALUES ($1, $2)
               RETURNING id, name, parent_id"#,
        )
        .bind(&request.name)
        .bind(request.parent_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| duplicate_name_error(e, &request.name))?;

        Ok(category.into())
    }

    pub async fn get(&self, id: i64) -> Result<CategoryResponse, ServiceError> {
        let category = self.fetch(id).await?;
        Ok(category.into())
    }

    pub async fn list(&self) -> Result<Vec<CategoryResponse>, ServiceError> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, parent_id FROM categories ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories.into_iter().map(Into::into).collect())
    }

    /// Direct children of the given category.
    pub async fn children(&self, id: i64) -> Result<Vec<CategoryResponse>, ServiceError> {
        self.fetch(id).await?;

        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, parent_id FROM categories WHERE parent_id = $1 ORDER BY id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(categories.into_iter().map(Into::into).collect())
    }

    pub async fn update(&self, id: i64, request: &CategoryRequest) -> Result<CategoryResponse, ServiceError> {
        if request.name.trim().is_empty() {
            return Err(ServiceError::Invalid("Category name is required".to_string()));
        }
        if request.parent_id == Some(id) {
            return Err(ServiceError::Invalid("Category cannot be its own parent".to_string()));
        }
        if let Some(parent_id) = request.parent_id {
            self.fetch(parent_id).await?;
        }

        let category = sqlx::query_as::<_, Category>(
            r#"UPDATE categories SET name = $2, parent_id = $3
               WHERE id = $1
               RETURNING id, name, parent_id"#,
        )
        .bind(id)
        .bind(&request.name)
        .bind(request.parent_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| duplicate_name_error(e, &request.name))?
        .ok_or_else(|| ServiceError::NotFound(format!("Category not found: {}", id)))?;

        Ok(category.into())
    }

    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound(format!("Category not found: {}", id)));
        }
        Ok(())
    }

    async fn fetch(&self, id: i64) -> Result<Category, ServiceError> {
        sqlx::query_as::<_, Category>(
            "SELECT id, name, parent_id FROM categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Category not found: {}", id)))
    }
}

fn duplicate_name_error(error: sqlx::Error, name: &str) -> ServiceError {
    match &error {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            ServiceError::Conflict(format!("Category already exists: {}", name))
        }
        _ => ServiceError::Database(error),
    }
}
