// End-to-end router tests driven through tower::ServiceExt::oneshot, with a
// fake directory store standing in for the identity provider. No Postgres,
// Redis or AWS connectivity is needed: the connection pool is lazy and these
// tests only exercise directory and auth routes.

use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use eb2c_api::auth::{generate_jwt, Claims};
use eb2c_api::database;
use eb2c_api::directory::{
    DirectoryError, DirectoryGroup, DirectoryStore, DirectoryUser, GroupDirectoryService,
    GroupRequest, UserDirectoryService, UserRequest,
};
use eb2c_api::handlers::{build_router, AppState};

#[derive(Default)]
struct FakeDirectoryStore {
    users: Mutex<Vec<DirectoryUser>>,
    groups: Mutex<Vec<DirectoryGroup>>,
}

impl FakeDirectoryStore {
    fn with_groups(groups: Vec<DirectoryGroup>) -> Self {
        Self {
            groups: Mutex::new(groups),
            ..Default::default()
        }
    }
}

#[async_trait]
impl DirectoryStore for FakeDirectoryStore {
    async fn create_user(&self, request: &UserRequest) -> Result<DirectoryUser, DirectoryError> {
        let user = user(&request.username);
        self.users.lock().unwrap().push(user.clone());
        Ok(user)
    }

    async fn get_user(&self, username: &str) -> Result<DirectoryUser, DirectoryError> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned()
            .ok_or_else(|| DirectoryError::NotFound(format!("User not found: {}", username)))
    }

    async fn list_users(&self, _limit: i32) -> Result<Vec<DirectoryUser>, DirectoryError> {
        Ok(self.users.lock().unwrap().clone())
    }

    async fn update_user_attributes(
        &self,
        _username: &str,
        _request: &UserRequest,
    ) -> Result<(), DirectoryError> {
        Ok(())
    }

    async fn delete_user(&self, username: &str) -> Result<(), DirectoryError> {
        self.users.lock().unwrap().retain(|u| u.username != username);
        Ok(())
    }

    async fn set_user_enabled(&self, _username: &str, _enabled: bool) -> Result<(), DirectoryError> {
        Ok(())
    }

    async fn reset_password(&self, _username: &str) -> Result<(), DirectoryError> {
        Ok(())
    }

    async fn user_groups(&self, _username: &str) -> Result<Vec<String>, DirectoryError> {
        Ok(Vec::new())
    }

    async fn add_user_to_group(
        &self,
        _username: &str,
        _group_name: &str,
    ) -> Result<(), DirectoryError> {
        Ok(())
    }

    async fn remove_user_from_group(
        &self,
        _username: &str,
        _group_name: &str,
    ) -> Result<(), DirectoryError> {
        Ok(())
    }

    async fn create_group(&self, request: &GroupRequest) -> Result<DirectoryGroup, DirectoryError> {
        let group = group(&request.group_name, request.precedence);
        self.groups.lock().unwrap().push(group.clone());
        Ok(group)
    }

    async fn get_group(&self, group_name: &str) -> Result<DirectoryGroup, DirectoryError> {
        self.groups
            .lock()
            .unwrap()
            .iter()
            .find(|g| g.group_name == group_name)
            .cloned()
            .ok_or_else(|| DirectoryError::NotFound(format!("Group not found: {}", group_name)))
    }

    async fn list_groups(&self, _limit: i32) -> Result<Vec<DirectoryGroup>, DirectoryError> {
        Ok(self.groups.lock().unwrap().clone())
    }

    async fn update_group(
        &self,
        _group_name: &str,
        _request: &GroupRequest,
    ) -> Result<(), DirectoryError> {
        Ok(())
    }

    async fn delete_group(&self, group_name: &str) -> Result<(), DirectoryError> {
        self.groups.lock().unwrap().retain(|g| g.group_name != group_name);
        Ok(())
    }

    async fn group_users(&self, _group_name: &str) -> Result<Vec<String>, DirectoryError> {
        Ok(Vec::new())
    }
}

fn user(username: &str) -> DirectoryUser {
    DirectoryUser {
        username: username.to_string(),
        user_id: Some(format!("sub-{}", username)),
        email: Some(format!("{}@example.com", username)),
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

fn group(name: &str, precedence: Option<i32>) -> DirectoryGroup {
    DirectoryGroup {
        group_name: name.to_string(),
        description: None,
        precedence,
        creation_date: None,
        last_modified_date: None,
        users: None,
    }
}

fn app(store: FakeDirectoryStore) -> axum::Router {
    let store: Arc<dyn DirectoryStore> = Arc::new(store);
    let state = AppState {
        pool: database::connect().expect("lazy pool"),
        users: UserDirectoryService::new(store.clone()),
        groups: GroupDirectoryService::new(store),
        publisher: None,
    };
    build_router(state)
}

fn bearer() -> String {
    let claims = Claims::new("admin".to_string(), 1, None, vec!["ADMIN".to_string()]);
    format!("Bearer {}", generate_jwt(claims).expect("token"))
}

async fn body_json(response: axum::response::Response) -> Result<Value> {
    let bytes = response.into_body().collect().await?.to_bytes();
    Ok(serde_json::from_slice(&bytes)?)
}

#[tokio::test]
async fn health_is_public() -> Result<()> {
    let app = app(FakeDirectoryStore::default());

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn api_routes_require_a_token() -> Result<()> {
    let app = app(FakeDirectoryStore::default());

    let response = app
        .oneshot(Request::builder().uri("/api/groups").body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn group_listing_pages_and_sorts() -> Result<()> {
    let store = FakeDirectoryStore::with_groups(vec![
        group("editors", Some(5)),
        group("admins", Some(1)),
        group("viewers", None),
        group("auditors", Some(3)),
    ]);
    let app = app(store);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/groups?page=0&size=2&sortBy=precedence&sortDirection=desc")
                .header(header::AUTHORIZATION, bearer())
                .body(Body::empty())?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await?;

    // Descending by precedence, null precedence always last
    assert_eq!(body["content"][0]["groupName"], "editors");
    assert_eq!(body["content"][1]["groupName"], "auditors");
    assert_eq!(body["totalElements"], 4);
    assert_eq!(body["totalPages"], 2);
    assert_eq!(body["last"], false);
    assert_eq!(body["sortBy"], "precedence");
    assert_eq!(body["sortDirection"], "desc");
    Ok(())
}

#[tokio::test]
async fn invalid_sort_field_is_a_validation_error() -> Result<()> {
    let app = app(FakeDirectoryStore::default());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/groups?sortBy=owner")
                .header(header::AUTHORIZATION, bearer())
                .body(Body::empty())?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Invalid sort field: owner"));
    assert!(body["field_errors"]["sortBy"]
        .as_str()
        .unwrap()
        .contains("precedence"));
    Ok(())
}

#[tokio::test]
async fn unknown_group_maps_to_not_found() -> Result<()> {
    let app = app(FakeDirectoryStore::default());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/groups/ghost")
                .header(header::AUTHORIZATION, bearer())
                .body(Body::empty())?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await?;
    assert_eq!(body["code"], "NOT_FOUND");
    Ok(())
}

#[tokio::test]
async fn user_listing_filters_case_insensitively() -> Result<()> {
    let store = FakeDirectoryStore::default();
    store.users.lock().unwrap().extend(vec![
        user("Alice"),
        user("alina"),
        user("bob"),
    ]);
    let app = app(store);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/cognito/users?filter=ali")
                .header(header::AUTHORIZATION, bearer())
                .body(Body::empty())?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await?;
    assert_eq!(body["totalElements"], 2);
    assert_eq!(body["content"][0]["username"], "Alice");
    assert_eq!(body["content"][1]["username"], "alina");
    Ok(())
}
