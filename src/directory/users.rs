use std::sync::Arc;

use tracing::debug;

use super::error::DirectoryError;
use super::store::DirectoryStore;
use super::types::{DirectoryUser, UserRequest, UserSortField};
use super::{upstream_limit, ListParams};
use crate::listing::{paginate, PagedResponse, SortField};

/// User-listing facade over the identity directory.
#[derive(Clone)]
pub struct UserDirectoryService {
    store: Arc<dyn DirectoryStore>,
}

impl UserDirectoryService {
    pub fn new(store: Arc<dyn DirectoryStore>) -> Self {
        Self { store }
    }

    pub async fn create_user(&self, request: &UserRequest) -> Result<DirectoryUser, DirectoryError> {
        if request.username.trim().is_empty() {
            return Err(DirectoryError::InvalidParameter("username is required".to_string()));
        }
        self.store.create_user(request).await
    }

    pub async fn get_user(&self, username: &str) -> Result<DirectoryUser, DirectoryError> {
        self.store.get_user(username).await
    }

    /// List users with pagination, filtering and sorting. The sort field is
    /// validated against the user allow-list before any provider call.
    pub async fn list_users(
        &self,
        params: &ListParams,
    ) -> Result<PagedResponse<DirectoryUser>, DirectoryError> {
        let sort_field = UserSortField::resolve(params.sort_by.as_deref())?;

        let limit = upstream_limit(params.page.size());
        debug!(limit, "fetching user batch from directory");
        let users = self.store.list_users(limit).await?;

        Ok(paginate(
            users,
            sort_field,
            params.sort_direction,
            params.filter.as_deref(),
            params.page,
        ))
    }

    pub async fn update_user(
        &self,
        username: &str,
        request: &UserRequest,
    ) -> Result<DirectoryUser, DirectoryError> {
        self.store.get_user(username).await?;
        self.store.update_user_attributes(username, request).await?;
        self.store.get_user(username).await
    }

    pub async fn delete_user(&self, username: &str) -> Result<(), DirectoryError> {
        self.store.get_user(username).await?;
        self.store.delete_user(username).await
    }

    pub async fn enable_user(&self, username: &str) -> Result<DirectoryUser, DirectoryError> {
        self.store.get_user(username).await?;
        self.store.set_user_enabled(username, true).await?;
        self.store.get_user(username).await
    }

    pub async fn disable_user(&self, username: &str) -> Result<DirectoryUser, DirectoryError> {
        self.store.get_user(username).await?;
        self.store.set_user_enabled(username, false).await?;
        self.store.get_user(username).await
    }

    pub async fn reset_password(&self, username: &str) -> Result<DirectoryUser, DirectoryError> {
        self.store.get_user(username).await?;
        self.store.reset_password(username).await?;
        self.store.get_user(username).await
    }

    pub async fn user_groups(&self, username: &str) -> Result<Vec<String>, DirectoryError> {
        self.store.user_groups(username).await
    }

    pub async fn add_user_to_group(
        &self,
        username: &str,
        group_name: &str,
    ) -> Result<DirectoryUser, DirectoryError> {
        self.store.get_user(username).await?;
        self.store.add_user_to_group(username, group_name).await?;
        self.store.get_user(username).await
    }

    pub async fn remove_user_from_group(
        &self,
        username: &str,
        group_name: &str,
    ) -> Result<DirectoryUser, DirectoryError> {
        self.store.get_user(username).await?;
        self.store.remove_user_from_group(username, group_name).await?;
        self.store.get_user(username).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::{ListingError, PageRequest, SortDirection};
    use crate::testing::InMemoryDirectoryStore;

    fn service(store: InMemoryDirectoryStore) -> UserDirectoryService {
        UserDirectoryService::new(Arc::new(store))
    }

    fn user(username: &str, email: Option<&str>) -> DirectoryUser {
        DirectoryUser {
            username: username.to_string(),
            user_id: Some(username.to_string()),
            email: email.map(str::to_string),
            phone_number: None,
            enabled: Some(true),
            email_verified: None,
            phone_number_verified: None,
            user_status: Some("CONFIRMED".to_string()),
            user_create_date: None,
            user_last_modified_date: None,
            groups: Vec::new(),
            attributes: Default::default(),
        }
    }

    #[tokio::test]
    async fn invalid_sort_field_is_rejected_before_any_fetch() {
        let store = InMemoryDirectoryStore::default();
        store.seed_user(user("alice", None));
        let svc = service(store.clone());

        let params = ListParams {
            sort_by: Some("passwordHash".to_string()),
            ..Default::default()
        };
        let err = svc.list_users(&params).await.unwrap_err();
        match err {
            DirectoryError::InvalidSort(ListingError::InvalidSortField { field, valid_fields }) => {
                assert_eq!(field, "passwordHash");
                assert_eq!(
                    valid_fields,
                    vec!["username", "email", "status", "enabled", "createDate"]
                );
            }
            other => panic!("expected InvalidSort, got {other:?}"),
        }
        assert_eq!(store.list_calls(), 0, "store must not be touched after rejection");
    }

    #[tokio::test]
    async fn lists_users_sorted_by_email() {
        let store = InMemoryDirectoryStore::default();
        store.seed_user(user("c", Some("charlie@example.com")));
        store.seed_user(user("a", Some("alice@example.com")));
        store.seed_user(user("b", None));
        let svc = service(store);

        let params = ListParams {
            sort_by: Some("email".to_string()),
            sort_direction: SortDirection::Desc,
            ..Default::default()
        };
        let page = svc.list_users(&params).await.unwrap();

        let emails: Vec<_> = page.content.iter().map(|u| u.email.clone()).collect();
        // Descending, record without email still last
        assert_eq!(
            emails,
            vec![
                Some("charlie@example.com".to_string()),
                Some("alice@example.com".to_string()),
                None
            ]
        );
        assert_eq!(page.sort_by, "email");
        assert_eq!(page.sort_direction, "desc");
    }

    #[tokio::test]
    async fn filter_matches_username_or_email() {
        let store = InMemoryDirectoryStore::default();
        store.seed_user(user("admin", Some("admin@example.com")));
        store.seed_user(user("jdoe", Some("john.admin@example.com")));
        store.seed_user(user("guest", Some("guest@example.com")));
        let svc = service(store);

        let params = ListParams {
            filter: Some("ADMIN".to_string()),
            ..Default::default()
        };
        let page = svc.list_users(&params).await.unwrap();
        assert_eq!(page.total_elements, 2);
        assert_eq!(page.filter.as_deref(), Some("ADMIN"));
    }

    #[tokio::test]
    async fn update_requires_existing_user() {
        let svc = service(InMemoryDirectoryStore::default());
        let request = UserRequest {
            username: "ghost".to_string(),
            email: Some("ghost@example.com".to_string()),
            ..Default::default()
        };
        let err = svc.update_user("ghost", &request).await.unwrap_err();
        assert!(matches!(err, DirectoryError::NotFound(_)));
    }

    #[tokio::test]
    async fn pagination_envelope_over_batched_fetch() {
        let store = InMemoryDirectoryStore::default();
        for i in 0..25 {
            store.seed_user(user(&format!("user{i:02}"), None));
        }
        let svc = service(store);

        let params = ListParams {
            page: PageRequest::new(1, 20),
            ..Default::default()
        };
        let page = svc.list_users(&params).await.unwrap();
        assert_eq!(page.total_elements, 25);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.content.len(), 5);
        assert!(page.last);
    }
}
