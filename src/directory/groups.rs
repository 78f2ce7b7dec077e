use std::sync::Arc;

use tracing::debug;

use super::error::DirectoryError;
use super::store::DirectoryStore;
use super::types::{DirectoryGroup, GroupRequest, GroupSortField};
use super::{upstream_limit, ListParams};
use crate::listing::{paginate, PagedResponse, SortField};

/// Group-listing facade over the identity directory.
#[derive(Clone)]
pub struct GroupDirectoryService {
    store: Arc<dyn DirectoryStore>,
}

impl GroupDirectoryService {
    pub fn new(store: Arc<dyn DirectoryStore>) -> Self {
        Self { store }
    }

    pub async fn create_group(&self, request: &GroupRequest) -> Result<DirectoryGroup, DirectoryError> {
        if request.group_name.trim().is_empty() {
            return Err(DirectoryError::InvalidParameter("groupName is required".to_string()));
        }
        self.store.create_group(request).await
    }

    pub async fn get_group(&self, group_name: &str) -> Result<DirectoryGroup, DirectoryError> {
        self.store.get_group(group_name).await
    }

    /// List groups with pagination, filtering and sorting. The sort field is
    /// validated against the group allow-list before any provider call.
    pub async fn list_groups(
        &self,
        params: &ListParams,
    ) -> Result<PagedResponse<DirectoryGroup>, DirectoryError> {
        let sort_field = GroupSortField::resolve(params.sort_by.as_deref())?;

        let limit = upstream_limit(params.page.size());
        debug!(limit, "fetching group batch from directory");
        let groups = self.store.list_groups(limit).await?;

        Ok(paginate(
            groups,
            sort_field,
            params.sort_direction,
            params.filter.as_deref(),
            params.page,
        ))
    }

    pub async fn update_group(
        &self,
        group_name: &str,
        request: &GroupRequest,
    ) -> Result<DirectoryGroup, DirectoryError> {
        self.store.get_group(group_name).await?;
        self.store.update_group(group_name, request).await?;
        self.store.get_group(group_name).await
    }

    pub async fn delete_group(&self, group_name: &str) -> Result<(), DirectoryError> {
        self.store.get_group(group_name).await?;
        self.store.delete_group(group_name).await
    }

    pub async fn group_users(&self, group_name: &str) -> Result<Vec<String>, DirectoryError> {
        self.store.get_group(group_name).await?;
        self.store.group_users(group_name).await
    }

    /// Add a user to the group, returning the group with its refreshed member
    /// list embedded.
    pub async fn add_user_to_group(
        &self,
        group_name: &str,
        username: &str,
    ) -> Result<DirectoryGroup, DirectoryError> {
        self.store.get_group(group_name).await?;
        self.store.add_user_to_group(username, group_name).await?;
        self.group_with_users(group_name).await
    }

    /// Remove a user from the group, returning the group with its refreshed
    /// member list embedded.
    pub async fn remove_user_from_group(
        &self,
        group_name: &str,
        username: &str,
    ) -> Result<DirectoryGroup, DirectoryError> {
        self.store.get_group(group_name).await?;
        self.store.remove_user_from_group(username, group_name).await?;
        self.group_with_users(group_name).await
    }

    async fn group_with_users(&self, group_name: &str) -> Result<DirectoryGroup, DirectoryError> {
        let mut group = self.store.get_group(group_name).await?;
        group.users = Some(self.store.group_users(group_name).await?);
        Ok(group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::{ListingError, PageRequest, SortDirection};
    use crate::testing::InMemoryDirectoryStore;
    use chrono::{TimeZone, Utc};

    fn service(store: InMemoryDirectoryStore) -> GroupDirectoryService {
        GroupDirectoryService::new(Arc::new(store))
    }

    fn group(name: &str, precedence: Option<i32>) -> DirectoryGroup {
        DirectoryGroup {
            group_name: name.to_string(),
            description: None,
            precedence,
            creation_date: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            last_modified_date: None,
            users: None,
        }
    }

    #[tokio::test]
    async fn invalid_sort_field_carries_group_allow_list() {
        let svc = service(InMemoryDirectoryStore::default());
        let params = ListParams {
            sort_by: Some("owner".to_string()),
            ..Default::default()
        };
        let err = svc.list_groups(&params).await.unwrap_err();
        match err {
            DirectoryError::InvalidSort(ListingError::InvalidSortField { valid_fields, .. }) => {
                assert_eq!(
                    valid_fields,
                    vec!["groupName", "description", "precedence", "creationDate"]
                );
            }
            other => panic!("expected InvalidSort, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn precedence_sort_keeps_missing_values_last_descending() {
        let store = InMemoryDirectoryStore::default();
        store.seed_group(group("editors", Some(5)));
        store.seed_group(group("admins", Some(1)));
        store.seed_group(group("lurkers", None));
        let svc = service(store);

        let params = ListParams {
            sort_by: Some("precedence".to_string()),
            sort_direction: SortDirection::Desc,
            ..Default::default()
        };
        let page = svc.list_groups(&params).await.unwrap();
        let precedences: Vec<_> = page.content.iter().map(|g| g.precedence).collect();
        assert_eq!(precedences, vec![Some(5), Some(1), None]);
    }

    #[tokio::test]
    async fn filter_matches_name_and_description_case_insensitively() {
        let store = InMemoryDirectoryStore::default();
        store.seed_group(group("TestGroup", None));
        store.seed_group(group("Other", None));
        let svc = service(store);

        let params = ListParams {
            filter: Some("test".to_string()),
            ..Default::default()
        };
        let page = svc.list_groups(&params).await.unwrap();
        assert_eq!(page.total_elements, 1);
        assert_eq!(page.content[0].group_name, "TestGroup");
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty_not_an_error() {
        let store = InMemoryDirectoryStore::default();
        store.seed_group(group("only", None));
        let svc = service(store);

        let params = ListParams {
            page: PageRequest::new(9, 20),
            ..Default::default()
        };
        let page = svc.list_groups(&params).await.unwrap();
        assert!(page.content.is_empty());
        assert_eq!(page.total_elements, 1);
        assert!(page.last);
    }

    #[tokio::test]
    async fn membership_change_returns_group_with_member_list() {
        let store = InMemoryDirectoryStore::default();
        store.seed_group(group("admins", Some(1)));
        store.seed_user(crate::testing::simple_user("alice"));
        let svc = service(store);

        let updated = svc.add_user_to_group("admins", "alice").await.unwrap();
        assert_eq!(updated.users, Some(vec!["alice".to_string()]));

        let removed = svc.remove_user_from_group("admins", "alice").await.unwrap();
        assert_eq!(removed.users, Some(Vec::new()));
    }

    #[tokio::test]
    async fn unknown_group_is_not_found() {
        let svc = service(InMemoryDirectoryStore::default());
        let err = svc.get_group("missing").await.unwrap_err();
        assert!(matches!(err, DirectoryError::NotFound(_)));
    }
}
