use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::database::models::{Product, ProductRequest, ProductResponse};
use crate::services::ServiceError;

const PRODUCT_COLUMNS: &str = "id, name, description, price, in_stock, stock";

/// Catalog operations: CRUD plus search, price and availability lookups.
pub struct ProductService {
    pool: PgPool,
}

impl ProductService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, request: &ProductRequest) -> Result<ProductResponse, ServiceError> {
        let name = request
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ServiceError::Invalid("Product name is required".to_string()))?;

        let product = sqlx::query_as::<_, Product>(&format!(
            r#"INSERT INTO products (name, description, price, in_stock, stock)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING {PRODUCT_COLUMNS}"#,
        ))
        .bind(name)
        .bind(&request.description)
        .bind(request.price)
        .bind(request.in_stock)
        .bind(request.stock)
        .fetch_one(&self.pool)
        .await?;

        Ok(product.into())
    }

    pub async fn get(&self, id: i64) -> Result<ProductResponse, ServiceError> {
        let product = self.fetch(id).await?;
        Ok(product.into())
    }

    pub async fn list(&self) -> Result<Vec<ProductResponse>, ServiceError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id",
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(products.into_iter().map(Into::into).collect())
    }

    /// Case-insensitive substring search over product names.
    pub async fn search_by_name(&self, name: &str) -> Result<Vec<ProductResponse>, ServiceError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE name ILIKE $1 ORDER BY id",
        ))
        .bind(format!("%{}%", name))
        .fetch_all(&self.pool)
        .await?;

        Ok(products.into_iter().map(Into::into).collect())
    }

    pub async fn under_price(&self, max_price: Decimal) -> Result<Vec<ProductResponse>, ServiceError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE price < $1 ORDER BY price",
        ))
        .bind(max_price)
        .fetch_all(&self.pool)
        .await?;

        Ok(products.into_iter().map(Into::into).collect())
    }

    pub async fn in_stock(&self) -> Result<Vec<ProductResponse>, ServiceError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE in_stock = TRUE ORDER BY id",
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(products.into_iter().map(Into::into).collect())
    }

    /// Partial update: name, description and price only change when present
    /// in the request, while the in-stock flag is always taken from it.
    pub async fn update(&self, id: i64, request: &ProductRequest) -> Result<ProductResponse, ServiceError> {
        let existing = self.fetch(id).await?;
        let merged = merge_update(existing, request);

        let product = sqlx::query_as::<_, Product>(&format!(
            r#"UPDATE products
               SET name = $2, description = $3, price = $4, in_stock = $5
               WHERE id = $1
               RETURNING {PRODUCT_COLUMNS}"#,
        ))
        .bind(id)
        .bind(merged.name)
        .bind(merged.description)
        .bind(merged.price)
        .bind(merged.in_stock)
        .fetch_one(&self.pool)
        .await?;

        Ok(product.into())
    }

    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound(format!("Product not found: {}", id)));
        }
        Ok(())
    }

    async fn fetch(&self, id: i64) -> Result<Product, ServiceError> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Product not found: {}", id)))
    }
}

/// Merges a partial update into the stored row. Name, description and price
/// keep their stored values when absent from the request; the in-stock flag
/// always comes from the request. Stock counts are not updated here.
fn merge_update(existing: Product, request: &ProductRequest) -> Product {
    Product {
        id: existing.id,
        name: request.name.clone().unwrap_or(existing.name),
        description: request.description.clone().or(existing.description),
        price: request.price.or(existing.price),
        in_stock: request.in_stock,
        stock: existing.stock,
    }
}
