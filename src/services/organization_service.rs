use sqlx::PgPool;

use crate::database::models::{Branch, Organization, OrganizationRequest, OrganizationResponse};
use crate::services::ServiceError;

/// CRUD and lookup operations for organizations and their branches.
pub struct OrganizationService {
    pool: PgPool,
}

impl OrganizationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, request: &OrganizationRequest) -> Result<OrganizationResponse, ServiceError> {
        if request.name.trim().is_empty() {
            return Err(ServiceError::Invalid("Organization name is required".to_string()));
        }

        let organization = sqlx::query_as::<_, Organization>(
            r#"INSERT INTO organizations (name, description, tax_id)
               VALUES ($1, $2, $3)
               RETURNING id, name, description, tax_id, created_at, updated_at"#,
        )
        .bind(&request.name)
        .bind(&request.description)
        .bind(&request.tax_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(OrganizationResponse::from_parts(organization, Vec::new()))
    }

    pub async fn get(&self, id: i64) -> Result<OrganizationResponse, ServiceError> {
        let organization = sqlx::query_as::<_, Organization>(
            "SELECT id, name, description, tax_id, created_at, updated_at FROM organizations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Organization not found: {}", id)))?;

        let branches = self.branches_of(id).await?;
        Ok(OrganizationResponse::from_parts(organization, branches))
    }

    pub async fn get_by_tax_id(&self, tax_id: &str) -> Result<OrganizationResponse, ServiceError> {
        let organization = sqlx::query_as::<_, Organization>(
            "SELECT id, name, description, tax_id, created_at, updated_at FROM organizations WHERE tax_id = $1",
        )
        .bind(tax_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Organization not found for tax id: {}", tax_id)))?;

        let branches = self.branches_of(organization.id).await?;
        Ok(OrganizationResponse::from_parts(organization, branches))
    }

    pub async fn list(&self) -> Result<Vec<OrganizationResponse>, ServiceError> {
        let organizations = sqlx::query_as::<_, Organization>(
            "SELECT id, name, description, tax_id, created_at, updated_at FROM organizations ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        self.with_branches(organizations).await
    }

    /// Case-insensitive substring search over organization names.
    pub async fn search_by_name(&self, name: &str) -> Result<Vec<OrganizationResponse>, ServiceError> {
        let organizations = sqlx::query_as::<_, Organization>(
            r#"SELECT id, name, description, tax_id, created_at, updated_at
               FROM organizations WHERE name ILIKE $1 ORDER BY id"#,
        )
        .bind(format!("%{}%", name))
        .fetch_all(&self.pool)
        .await?;

        self.with_branches(organizations).await
    }

    pub async fn update(&self, id: i64, request: &OrganizationRequest) -> Result<OrganizationResponse, ServiceError> {
        if request.name.trim().is_empty() {
            return Err(ServiceError::Invalid("Organization name is required".to_string()));
        }

        let organization = sqlx::query_as::<_, Organization>(
            r#"UPDATE organizations
               SET name = $2, description = $3, tax_id = $4, updated_at = NOW()
               WHERE id = $1
               RETURNING id, name, description, tax_id, created_at, updated_at"#,
        )
        .bind(id)
        .bind(&request.name)
        .bind(&request.description)
        .bind(&request.tax_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Organization not found: {}", id)))?;

        let branches = self.branches_of(id).await?;
        Ok(OrganizationResponse::from_parts(organization, branches))
    }

    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let result = sqlx::query("DELETE FROM organizations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound(format!("Organization not found: {}", id)));
        }
        Ok(())
    }

    async fn branches_of(&self, organization_id: i64) -> Result<Vec<Branch>, ServiceError> {
        let branches = sqlx::query_as::<_, Branch>(
            "SELECT id, name, address, phone, email, organization_id FROM branches WHERE organization_id = $1 ORDER BY id",
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(branches)
    }

    async fn with_branches(
        &self,
        organizations: Vec<Organization>,
    ) -> Result<Vec<OrganizationResponse>, ServiceError> {
        let mut responses = Vec::with_capacity(organizations.len());
        for organization in organizations {
            let branches = self.branches_of(organization.id).await?;
            responses.push(OrganizationResponse::from_parts(organization, branches));
        }
        Ok(responses)
    }
}
