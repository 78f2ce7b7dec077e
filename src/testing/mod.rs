//! Test doubles shared by unit tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::directory::{
    DirectoryError, DirectoryGroup, DirectoryStore, DirectoryUser, GroupRequest, UserRequest,
};

/// In-memory [`DirectoryStore`] standing in for the Cognito user pool.
///
/// Keyed maps iterate in name order, so listing tests get a stable pre-sort
/// order.
#[derive(Clone, Default)]
pub struct InMemoryDirectoryStore {
    inner: Arc<Mutex<State>>,
    list_calls: Arc<AtomicUsize>,
}

#[derive(Default)]
struct State {
    users: BTreeMap<String, DirectoryUser>,
    groups: BTreeMap<String, DirectoryGroup>,
    memberships: Vec<(String, String)>, // (username, group_name)
}

pub fn simple_user(username: &str) -> DirectoryUser {
    DirectoryUser {
        username: username.to_string(),
        user_id: Some(username.to_string()),
        email: None,
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

impl InMemoryDirectoryStore {
    pub fn seed_user(&self, user: DirectoryUser) {
        let mut state = self.inner.lock().unwrap();
        state.users.insert(user.username.clone(), user);
    }

    pub fn seed_group(&self, group: DirectoryGroup) {
        let mut state = self.inner.lock().unwrap();
        state.groups.insert(group.group_name.clone(), group);
    }

    /// Number of list calls the store has served; listing services must not
    /// reach the store when sort validation fails.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn groups_of(state: &State, username: &str) -> Vec<String> {
        state
            .memberships
            .iter()
            .filter(|(u, _)| u == username)
            .map(|(_, g)| g.clone())
            .collect()
    }
}

#[async_trait]
impl DirectoryStore for InMemoryDirectoryStore {
    async fn create_user(&self, request: &UserRequest) -> Result<DirectoryUser, DirectoryError> {
        let mut state = self.inner.lock().unwrap();
        if state.users.contains_key(&request.username) {
            return Err(DirectoryError::AlreadyExists(format!(
                "User already exists: {}",
                request.username
            )));
        }
        let mut user = simple_user(&request.username);
        user.email = request.email.clone();
        user.phone_number = request.phone_number.clone();
        user.email_verified = request.email_verified;
        user.phone_number_verified = request.phone_number_verified;
        state.users.insert(request.username.clone(), user.clone());
        Ok(user)
    }

    async fn get_user(&self, username: &str) -> Result<DirectoryUser, DirectoryError> {
        let state = self.inner.lock().unwrap();
        let mut user = state
            .users
            .get(username)
            .cloned()
            .ok_or_else(|| DirectoryError::NotFound(format!("User not found: {username}")))?;
        user.groups = Self::groups_of(&state, username);
        Ok(user)
    }

    async fn list_users(&self, limit: i32) -> Result<Vec<DirectoryUser>, DirectoryError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let state = self.inner.lock().unwrap();
        Ok(state.users.values().take(limit as usize).cloned().collect())
    }

    async fn update_user_attributes(
        &self,
        username: &str,
        request: &UserRequest,
    ) -> Result<(), DirectoryError> {
        let mut state = self.inner.lock().unwrap();
        let user = state
            .users
            .get_mut(username)
            .ok_or_else(|| DirectoryError::NotFound(format!("User not found: {username}")))?;
        if request.email.is_some() {
            user.email = request.email.clone();
        }
        if request.phone_number.is_some() {
            user.phone_number = request.phone_number.clone();
        }
        if request.email_verified.is_some() {
            user.email_verified = request.email_verified;
        }
        if request.phone_number_verified.is_some() {
            user.phone_number_verified = request.phone_number_verified;
        }
        Ok(())
    }

    async fn delete_user(&self, username: &str) -> Result<(), DirectoryError> {
        let mut state = self.inner.lock().unwrap();
        state
            .users
            .remove(username)
            .map(|_| ())
            .ok_or_else(|| DirectoryError::NotFound(format!("User not found: {username}")))
    }

    async fn set_user_enabled(&self, username: &str, enabled: bool) -> Result<(), DirectoryError> {
        let mut state = self.inner.lock().unwrap();
        let user = state
            .users
            .get_mut(username)
            .ok_or_else(|| DirectoryError::NotFound(format!("User not found: {username}")))?;
        user.enabled = Some(enabled);
        Ok(())
    }

    async fn reset_password(&self, username: &str) -> Result<(), DirectoryError> {
        let mut state = self.inner.lock().unwrap();
        let user = state
            .users
            .get_mut(username)
            .ok_or_else(|| DirectoryError::NotFound(format!("User not found: {username}")))?;
        user.user_status = Some("RESET_REQUIRED".to_string());
        Ok(())
    }

    async fn user_groups(&self, username: &str) -> Result<Vec<String>, DirectoryError> {
        let state = self.inner.lock().unwrap();
        if !state.users.contains_key(username) {
            return Err(DirectoryError::NotFound(format!("User not found: {username}")));
        }
        Ok(Self::groups_of(&state, username))
    }

    async fn add_user_to_group(&self, username: &str, group_name: &str) -> Result<(), DirectoryError> {
        let mut state = self.inner.lock().unwrap();
        let pair = (username.to_string(), group_name.to_string());
        if !state.memberships.contains(&pair) {
            state.memberships.push(pair);
        }
        Ok(())
    }

    async fn remove_user_from_group(
        &self,
        username: &str,
        group_name: &str,
    ) -> Result<(), DirectoryError> {
        let mut state = self.inner.lock().unwrap();
        state
            .memberships
            .retain(|(u, g)| !(u == username && g == group_name));
        Ok(())
    }

    async fn create_group(&self, request: &GroupRequest) -> Result<DirectoryGroup, DirectoryError> {
        let mut state = self.inner.lock().unwrap();
        if state.groups.contains_key(&request.group_name) {
            return Err(DirectoryError::AlreadyExists(format!(
                "Group already exists: {}",
                request.group_name
            )));
        }
        let group = DirectoryGroup {
            group_name: request.group_name.clone(),
            description: request.description.clone(),
            precedence: request.precedence,
            creation_date: Some(chrono::Utc::now()),
            last_modified_date: Some(chrono::Utc::now()),
            users: None,
        };
        state.groups.insert(request.group_name.clone(), group.clone());
        Ok(group)
    }

    async fn get_group(&self, group_name: &str) -> Result<DirectoryGroup, DirectoryError> {
        let state = self.inner.lock().unwrap();
        state
            .groups
            .get(group_name)
            .cloned()
            .ok_or_else(|| DirectoryError::NotFound(format!("Group not found: {group_name}")))
    }

    async fn list_groups(&self, limit: i32) -> Result<Vec<DirectoryGroup>, DirectoryError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let state = self.inner.lock().unwrap();
        Ok(state.groups.values().take(limit as usize).cloned().collect())
    }

    async fn update_group(
        &self,
        group_name: &str,
        request: &GroupRequest,
    ) -> Result<(), DirectoryError> {
        let mut state = self.inner.lock().unwrap();
        let group = state
            .groups
            .get_mut(group_name)
            .ok_or_else(|| DirectoryError::NotFound(format!("Group not found: {group_name}")))?;
        if request.description.is_some() {
            group.description = request.description.clone();
        }
        if request.precedence.is_some() {
            group.precedence = request.precedence;
        }
        group.last_modified_date = Some(chrono::Utc::now());
        Ok(())
    }

    async fn delete_group(&self, group_name: &str) -> Result<(), DirectoryError> {
        let mut state = self.inner.lock().unwrap();
        state
            .groups
            .remove(group_name)
            .map(|_| ())
            .ok_or_else(|| DirectoryError::NotFound(format!("Group not found: {group_name}")))?;
        state.memberships.retain(|(_, g)| g != group_name);
        Ok(())
    }

    async fn group_users(&self, group_name: &str) -> Result<Vec<String>, DirectoryError> {
        let state = self.inner.lock().unwrap();
        Ok(state
            .memberships
            .iter()
            .filter(|(_, g)| g == group_name)
            .map(|(u, _)| u.clone())
            .collect())
    }
}
