use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::listing::{cmp_nulls_last, Listable, SortDirection, SortField};

/// A user record as surfaced by the identity directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryUser {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_verified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number_verified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_create_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_last_modified_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub attributes: HashMap<String, String>,
}

/// A group record as surfaced by the identity directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryGroup {
    pub group_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precedence: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserSortField {
    Username,
    Email,
    Status,
    Enabled,
    CreateDate,
}

impl SortField for UserSortField {
    const ALLOWED: &'static [&'static str] = &["username", "email", "status", "enabled", "createDate"];

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "username" => Some(UserSortField::Username),
            "email" => Some(UserSortField::Email),
            "status" => Some(UserSortField::Status),
            "enabled" => Some(UserSortField::Enabled),
            "createDate" => Some(UserSortField::CreateDate),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            UserSortField::Username => "username",
            UserSortField::Email => "email",
            UserSortField::Status => "status",
            UserSortField::Enabled => "enabled",
            UserSortField::CreateDate => "createDate",
        }
    }
}

impl Listable for DirectoryUser {
    type Field = UserSortField;
    const DEFAULT_FIELD: UserSortField = UserSortField::Username;

    fn compare_by(&self, other: &Self, field: UserSortField, direction: SortDirection) -> Ordering {
        match field {
            UserSortField::Username => {
                cmp_nulls_last(Some(&self.username), Some(&other.username), direction)
            }
            UserSortField::Email => cmp_nulls_last(self.email.as_ref(), other.email.as_ref(), direction),
            UserSortField::Status => {
                cmp_nulls_last(self.user_status.as_ref(), other.user_status.as_ref(), direction)
            }
            UserSortField::Enabled => {
                cmp_nulls_last(self.enabled.as_ref(), other.enabled.as_ref(), direction)
            }
            UserSortField::CreateDate => cmp_nulls_last(
                self.user_create_date.as_ref(),
                other.user_create_date.as_ref(),
                direction,
            ),
        }
    }

    fn matches(&self, needle: &str) -> bool {
        self.username.to_lowercase().contains(needle)
            || self
                .email
                .as_ref()
                .is_some_and(|e| e.to_lowercase().contains(needle))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupSortField {
    GroupName,
    Description,
    Precedence,
    CreationDate,
}

impl SortField for GroupSortField {
    const ALLOWED: &'static [&'static str] = &["groupName", "description", "precedence", "creationDate"];

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "groupName" => Some(GroupSortField::GroupName),
            "description" => Some(GroupSortField::Description),
            "precedence" => Some(GroupSortField::Precedence),
            "creationDate" => Some(GroupSortField::CreationDate),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            GroupSortField::GroupName => "groupName",
            GroupSortField::Description => "description",
            GroupSortField::Precedence => "precedence",
            GroupSortField::CreationDate => "creationDate",
        }
    }
}

impl Listable for DirectoryGroup {
    type Field = GroupSortField;
    const DEFAULT_FIELD: GroupSortField = GroupSortField::GroupName;

    fn compare_by(&self, other: &Self, field: GroupSortField, direction: SortDirection) -> Ordering {
        match field {
            GroupSortField::GroupName => {
                cmp_nulls_last(Some(&self.group_name), Some(&other.group_name), direction)
            }
            GroupSortField::Description => {
                cmp_nulls_last(self.description.as_ref(), other.description.as_ref(), direction)
            }
            GroupSortField::Precedence => {
                cmp_nulls_last(self.precedence.as_ref(), other.precedence.as_ref(), direction)
            }
            GroupSortField::CreationDate => cmp_nulls_last(
                self.creation_date.as_ref(),
                other.creation_date.as_ref(),
                direction,
            ),
        }
    }

    fn matches(&self, needle: &str) -> bool {
        self.group_name.to_lowercase().contains(needle)
            || self
                .description
                .as_ref()
                .is_some_and(|d| d.to_lowercase().contains(needle))
    }
}

/// Payload for creating or updating a directory user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    // Ignored on update; the username comes from the path there
    #[serde(default)]
    pub username: String,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone_number: Option<String>,
    pub email_verified: Option<bool>,
    pub phone_number_verified: Option<bool>,
    pub attributes: Option<HashMap<String, String>>,
}

/// Payload for creating or updating a directory group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRequest {
    // Ignored on update; the group name comes from the path there
    #[serde(default)]
    pub group_name: String,
    pub description: Option<String>,
    pub precedence: Option<i32>,
}
