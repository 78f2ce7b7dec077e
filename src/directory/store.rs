use async_trait::async_trait;

use super::error::DirectoryError;
use super::types::{DirectoryGroup, DirectoryUser, GroupRequest, UserRequest};

/// Seam to the upstream identity provider.
///
/// The provider's list calls are not offset-paginated; `list_users` and
/// `list_groups` take only an upstream batch limit, and the listing services
/// handle filtering, sorting and pagination locally. The store must not narrow
/// the batch itself: the provider's filter expressions match a single field,
/// while the local filter ORs across several.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    async fn create_user(&self, request: &UserRequest) -> Result<DirectoryUser, DirectoryError>;
    async fn get_user(&self, username: &str) -> Result<DirectoryUser, DirectoryError>;
    async fn list_users(&self, limit: i32) -> Result<Vec<DirectoryUser>, DirectoryError>;
    async fn update_user_attributes(
        &self,
        username: &str,
        request: &UserRequest,
    ) -> Result<(), DirectoryError>;
    async fn delete_user(&self, username: &str) -> Result<(), DirectoryError>;
    async fn set_user_enabled(&self, username: &str, enabled: bool) -> Result<(), DirectoryError>;
    async fn reset_password(&self, username: &str) -> Result<(), DirectoryError>;
    async fn user_groups(&self, username: &str) -> Result<Vec<String>, DirectoryError>;
    async fn add_user_to_group(&self, username: &str, group_name: &str) -> Result<(), DirectoryError>;
    async fn remove_user_from_group(
        &self,
        username: &str,
        group_name: &str,
    ) -> Result<(), DirectoryError>;

    async fn create_group(&self, request: &GroupRequest) -> Result<DirectoryGroup, DirectoryError>;
    async fn get_group(&self, group_name: &str) -> Result<DirectoryGroup, DirectoryError>;
    async fn list_groups(&self, limit: i32) -> Result<Vec<DirectoryGroup>, DirectoryError>;
    async fn update_group(
        &self,
        group_name: &str,
        request: &GroupRequest,
    ) -> Result<(), DirectoryError>;
    async fn delete_group(&self, group_name: &str) -> Result<(), DirectoryError>;
    async fn group_users(&self, group_name: &str) -> Result<Vec<String>, DirectoryError>;
}
