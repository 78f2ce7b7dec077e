//! Cognito-backed identity directory: user and group facades over an upstream
//! identity provider that has no offset pagination of its own.

pub mod cognito;
pub mod error;
pub mod groups;
pub mod store;
pub mod types;
pub mod users;

pub use cognito::CognitoDirectoryStore;
pub use error::DirectoryError;
pub use groups::GroupDirectoryService;
pub use store::DirectoryStore;
pub use types::{DirectoryGroup, DirectoryUser, GroupRequest, UserRequest};
pub use users::UserDirectoryService;

use crate::listing::{PageRequest, SortDirection};

/// Listing parameters as they arrive from the HTTP layer, sort field still a
/// raw string. Services validate it against the record type's allow-list
/// before touching the store.
#[derive(Debug, Clone, Default)]
pub struct ListParams {
    pub page: PageRequest,
    pub sort_by: Option<String>,
    pub sort_direction: SortDirection,
    pub filter: Option<String>,
}

/// Upstream batch size for one listing call: over-fetch to leave room for
/// post-fetch filtering, capped at the provider's page limit of 60. Known
/// precision trade-off: when a filter drops many records spread across several
/// upstream pages, `totalElements` reflects only this batch.
pub(crate) fn upstream_limit(page_size: u32) -> i32 {
    (page_size * 3).min(60) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_limit_is_capped_at_sixty() {
        assert_eq!(upstream_limit(10), 30);
        assert_eq!(upstream_limit(20), 60);
        assert_eq!(upstream_limit(100), 60);
        assert_eq!(upstream_limit(1), 3);
    }
}
