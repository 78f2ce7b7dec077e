use thiserror::Error;

use crate::listing::ListingError;

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    AlreadyExists(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    InvalidSort(#[from] ListingError),

    // Any other failure from the identity provider, passed through unmodified
    #[error("{0}")]
    Provider(String),
}
