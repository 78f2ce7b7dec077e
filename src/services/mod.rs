pub mod account_service;
pub mod bootstrap;
pub mod category_service;
pub mod organization_service;
pub mod product_service;

pub use account_service::AccountService;
pub use category_service::CategoryService;
pub use organization_service::OrganizationService;
pub use product_service::ProductService;

use thiserror::Error;

/// Shared error type for the relational services.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Invalid(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}
