use async_trait::async_trait;
use aws_sdk_cognitoidentityprovider::primitives::DateTime as AwsDateTime;
use aws_sdk_cognitoidentityprovider::types::{AttributeType, GroupType, MessageActionType, UserType};
use aws_sdk_cognitoidentityprovider::Client;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

use super::error::DirectoryError;
use super::store::DirectoryStore;
use super::types::{DirectoryGroup, DirectoryUser, GroupRequest, UserRequest};

/// Identity directory backed by an AWS Cognito user pool.
///
/// Pure request/response shuttling: every call maps one Cognito operation and
/// wraps provider failures without retrying.
#[derive(Clone)]
pub struct CognitoDirectoryStore {
    client: Client,
    user_pool_id: String,
}

impl CognitoDirectoryStore {
    pub fn new(client: Client, user_pool_id: impl Into<String>) -> Self {
        Self {
            client,
            user_pool_id: user_pool_id.into(),
        }
    }

    pub async fn from_env(user_pool_id: impl Into<String>) -> Self {
        let shared = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(Client::new(&shared), user_pool_id)
    }

    fn attribute(name: &str, value: &str) -> Result<AttributeType, DirectoryError> {
        AttributeType::builder()
            .name(name)
            .value(value)
            .build()
            .map_err(|e| DirectoryError::InvalidParameter(e.to_string()))
    }

    fn user_attributes(request: &UserRequest) -> Result<Vec<AttributeType>, DirectoryError> {
        let mut attrs = Vec::new();
        if let Some(email) = &request.email {
            attrs.push(Self::attribute("email", email)?);
        }
        if let Some(verified) = request.email_verified {
            attrs.push(Self::attribute("email_verified", &verified.to_string())?);
        }
        if let Some(phone) = &request.phone_number {
            attrs.push(Self::attribute("phone_number", phone)?);
        }
        if let Some(verified) = request.phone_number_verified {
            attrs.push(Self::attribute("phone_number_verified", &verified.to_string())?);
        }
        if let Some(extra) = &request.attributes {
            for (name, value) in extra {
                attrs.push(Self::attribute(name, value)?);
            }
        }
        Ok(attrs)
    }

    async fn map_user(&self, user: &UserType) -> Result<DirectoryUser, DirectoryError> {
        let username = user.username().unwrap_or_default().to_string();
        let attributes: HashMap<String, String> = user
            .attributes()
            .iter()
            .filter_map(|a| a.value().map(|v| (a.name().to_string(), v.to_string())))
            .collect();

        let groups = self.user_groups(&username).await?;

        Ok(DirectoryUser {
            user_id: attributes.get("sub").cloned().or_else(|| Some(username.clone())),
            email: attributes.get("email").cloned(),
            phone_number: attributes.get("phone_number").cloned(),
            enabled: Some(user.enabled()),
            email_verified: attributes.get("email_verified").map(|v| v == "true"),
            phone_number_verified: attributes.get("phone_number_verified").map(|v| v == "true"),
            user_status: user.user_status().map(|s| s.as_str().to_string()),
            user_create_date: user.user_create_date().and_then(to_chrono),
            user_last_modified_date: user.user_last_modified_date().and_then(to_chrono),
            groups,
            attributes,
            username,
        })
    }

    fn map_group(group: &GroupType) -> DirectoryGroup {
        DirectoryGroup {
            group_name: group.group_name().unwrap_or_default().to_string(),
            description: group.description().map(str::to_string),
            precedence: group.precedence(),
            creation_date: group.creation_date().and_then(to_chrono),
            last_modified_date: group.last_modified_date().and_then(to_chrono),
            users: None,
        }
    }
}

fn to_chrono(dt: &AwsDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(dt.secs(), dt.subsec_nanos())
}

/// Exact-match ListUsers filter expression. The username is interpolated into
/// a quoted string, so embedded quotes or backslashes are rejected rather than
/// corrupting the expression.
fn exact_username_filter(username: &str) -> Result<String, DirectoryError> {
    if username.contains('"') || username.contains('\\') {
        return Err(DirectoryError::InvalidParameter(format!(
            "username contains characters not allowed in a filter expression: {username}"
        )));
    }
    Ok(format!("username = \"{username}\""))
}

#[async_trait]
impl DirectoryStore for CognitoDirectoryStore {
    async fn create_user(&self, request: &UserRequest) -> Result<DirectoryUser, DirectoryError> {
        let attrs = Self::user_attributes(request)?;
        let result = self
            .client
            .admin_create_user()
            .user_pool_id(&self.user_pool_id)
            .username(&request.username)
            .set_temporary_password(request.password.clone())
            .message_action(MessageActionType::Suppress)
            .set_user_attributes(Some(attrs))
            .send()
            .await;

        match result {
            Ok(output) => match output.user() {
                Some(user) => self.map_user(user).await,
                None => Err(DirectoryError::Provider(
                    "provider returned no user for create".to_string(),
                )),
            },
            Err(e) => {
                let err = e.into_service_error();
                if err.is_username_exists_exception() {
                    Err(DirectoryError::AlreadyExists(format!(
                        "User already exists: {}",
                        request.username
                    )))
                } else if err.is_invalid_parameter_exception() {
                    Err(DirectoryError::InvalidParameter(err.to_string()))
                } else {
                    Err(DirectoryError::Provider(err.to_string()))
                }
            }
        }
    }

    async fn get_user(&self, username: &str) -> Result<DirectoryUser, DirectoryError> {
        // Exact-match provider filter; avoids a second user shape in the mapping
        let result = self
            .client
            .list_users()
            .user_pool_id(&self.user_pool_id)
            .filter(exact_username_filter(username)?)
            .limit(1)
            .send()
            .await;

        match result {
            Ok(output) => match output.users().first() {
                Some(user) => self.map_user(user).await,
                None => Err(DirectoryError::NotFound(format!("User not found: {username}"))),
            },
            Err(e) => Err(DirectoryError::Provider(e.into_service_error().to_string())),
        }
    }

    async fn list_users(&self, limit: i32) -> Result<Vec<DirectoryUser>, DirectoryError> {
        // No provider-side filter: Cognito filter expressions match one field
        // only, while the listing service ORs its substring filter across
        // username and email over the full batch.
        let output = self
            .client
            .list_users()
            .user_pool_id(&self.user_pool_id)
            .limit(limit)
            .send()
            .await
            .map_err(|e| DirectoryError::Provider(e.into_service_error().to_string()))?;

        let mut users = Vec::with_capacity(output.users().len());
        for user in output.users() {
            users.push(self.map_user(user).await?);
        }
        Ok(users)
    }

    async fn update_user_attributes(
        &self,
        username: &str,
        request: &UserRequest,
    ) -> Result<(), DirectoryError> {
        let attrs = Self::user_attributes(request)?;
        if attrs.is_empty() {
            return Ok(());
        }

        self.client
            .admin_update_user_attributes()
            .user_pool_id(&self.user_pool_id)
            .username(username)
            .set_user_attributes(Some(attrs))
            .send()
            .await
            .map_err(|e| {
                let err = e.into_service_error();
                if err.is_user_not_found_exception() {
                    DirectoryError::NotFound(format!("User not found: {username}"))
                } else {
                    DirectoryError::Provider(err.to_string())
                }
            })?;
        Ok(())
    }

    async fn delete_user(&self, username: &str) -> Result<(), DirectoryError> {
        self.client
            .admin_delete_user()
            .user_pool_id(&self.user_pool_id)
            .username(username)
            .send()
            .await
            .map_err(|e| {
                let err = e.into_service_error();
                if err.is_user_not_found_exception() {
                    DirectoryError::NotFound(format!("User not found: {username}"))
                } else {
                    DirectoryError::Provider(err.to_string())
                }
            })?;
        Ok(())
    }

    async fn set_user_enabled(&self, username: &str, enabled: bool) -> Result<(), DirectoryError> {
        let result = if enabled {
            self.client
                .admin_enable_user()
                .user_pool_id(&self.user_pool_id)
                .username(username)
                .send()
                .await
                .map(|_| ())
                .map_err(|e| e.into_service_error().to_string())
        } else {
            self.client
                .admin_disable_user()
                .user_pool_id(&self.user_pool_id)
                .username(username)
                .send()
                .await
                .map(|_| ())
                .map_err(|e| e.into_service_error().to_string())
        };
        result.map_err(DirectoryError::Provider)
    }

    async fn reset_password(&self, username: &str) -> Result<(), DirectoryError> {
        self.client
            .admin_reset_user_password()
            .user_pool_id(&self.user_pool_id)
            .username(username)
            .send()
            .await
            .map_err(|e| DirectoryError::Provider(e.into_service_error().to_string()))?;
        Ok(())
    }

    async fn user_groups(&self, username: &str) -> Result<Vec<String>, DirectoryError> {
        let output = self
            .client
            .admin_list_groups_for_user()
            .user_pool_id(&self.user_pool_id)
            .username(username)
            .send()
            .await
            .map_err(|e| {
                let err = e.into_service_error();
                if err.is_user_not_found_exception() {
                    DirectoryError::NotFound(format!("User not found: {username}"))
                } else {
                    DirectoryError::Provider(err.to_string())
                }
            })?;

        Ok(output
            .groups()
            .iter()
            .filter_map(|g| g.group_name().map(str::to_string))
            .collect())
    }

    async fn add_user_to_group(&self, username: &str, group_name: &str) -> Result<(), DirectoryError> {
        self.client
            .admin_add_user_to_group()
            .user_pool_id(&self.user_pool_id)
            .username(username)
            .group_name(group_name)
            .send()
            .await
            .map_err(|e| DirectoryError::Provider(e.into_service_error().to_string()))?;
        Ok(())
    }

    async fn remove_user_from_group(
        &self,
        username: &str,
        group_name: &str,
    ) -> Result<(), DirectoryError> {
        self.client
            .admin_remove_user_from_group()
            .user_pool_id(&self.user_pool_id)
            .username(username)
            .group_name(group_name)
            .send()
            .await
            .map_err(|e| DirectoryError::Provider(e.into_service_error().to_string()))?;
        Ok(())
    }

    async fn create_group(&self, request: &GroupRequest) -> Result<DirectoryGroup, DirectoryError> {
        let result = self
            .client
            .create_group()
            .user_pool_id(&self.user_pool_id)
            .group_name(&request.group_name)
            .set_description(request.description.clone())
            .set_precedence(request.precedence)
            .send()
            .await;

        match result {
            Ok(output) => output
                .group()
                .map(Self::map_group)
                .ok_or_else(|| DirectoryError::Provider("provider returned no group for create".to_string())),
            Err(e) => {
                let err = e.into_service_error();
                if err.is_group_exists_exception() {
                    Err(DirectoryError::AlreadyExists(format!(
                        "Group already exists: {}",
                        request.group_name
                    )))
                } else if err.is_invalid_parameter_exception() {
                    Err(DirectoryError::InvalidParameter(err.to_string()))
                } else {
                    Err(DirectoryError::Provider(err.to_string()))
                }
            }
        }
    }

    async fn get_group(&self, group_name: &str) -> Result<DirectoryGroup, DirectoryError> {
        let result = self
            .client
            .get_group()
            .user_pool_id(&self.user_pool_id)
            .group_name(group_name)
            .send()
            .await;

        match result {
            Ok(output) => output
                .group()
                .map(Self::map_group)
                .ok_or_else(|| DirectoryError::NotFound(format!("Group not found: {group_name}"))),
            Err(e) => {
                let err = e.into_service_error();
                if err.is_resource_not_found_exception() {
                    Err(DirectoryError::NotFound(format!("Group not found: {group_name}")))
                } else {
                    Err(DirectoryError::Provider(err.to_string()))
                }
            }
        }
    }

    async fn list_groups(&self, limit: i32) -> Result<Vec<DirectoryGroup>, DirectoryError> {
        let output = self
            .client
            .list_groups()
            .user_pool_id(&self.user_pool_id)
            .limit(limit)
            .send()
            .await
            .map_err(|e| DirectoryError::Provider(e.into_service_error().to_string()))?;

        Ok(output.groups().iter().map(Self::map_group).collect())
    }

    async fn update_group(
        &self,
        group_name: &str,
        request: &GroupRequest,
    ) -> Result<(), DirectoryError> {
        self.client
            .update_group()
            .user_pool_id(&self.user_pool_id)
            .group_name(group_name)
            .set_description(request.description.clone())
            .set_precedence(request.precedence)
            .send()
            .await
            .map_err(|e| {
                let err = e.into_service_error();
                if err.is_resource_not_found_exception() {
                    DirectoryError::NotFound(format!("Group not found: {group_name}"))
                } else {
                    DirectoryError::Provider(err.to_string())
                }
            })?;
        Ok(())
    }

    async fn delete_group(&self, group_name: &str) -> Result<(), DirectoryError> {
        self.client
            .delete_group()
            .user_pool_id(&self.user_pool_id)
            .group_name(group_name)
            .send()
            .await
            .map_err(|e| {
                let err = e.into_service_error();
                if err.is_resource_not_found_exception() {
                    DirectoryError::NotFound(format!("Group not found: {group_name}"))
                } else {
                    DirectoryError::Provider(err.to_string())
                }
            })?;
        Ok(())
    }

    async fn group_users(&self, group_name: &str) -> Result<Vec<String>, DirectoryError> {
        let output = self
            .client
            .list_users_in_group()
            .user_pool_id(&self.user_pool_id)
            .group_name(group_name)
            .send()
            .await
            .map_err(|e| {
                let err = e.into_service_error();
                if err.is_resource_not_found_exception() {
                    DirectoryError::NotFound(format!("Group not found: {group_name}"))
                } else {
                    DirectoryError::Provider(err.to_string())
                }
            })?;

        Ok(output
            .users()
            .iter()
            .filter_map(|u| u.username().map(str::to_string))
            .collect())
    }
}
