// handlers/mod.rs - HTTP handlers grouped by resource
//
// Two security tiers: public (no auth, /auth/* and /health) and protected
// (JWT auth, everything under /api/*).

pub mod accounts;
pub mod auth;
pub mod categories;
pub mod directory_groups;
pub mod directory_users;
pub mod health;
pub mod organizations;
pub mod products;

use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use sqlx::PgPool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::directory::{GroupDirectoryService, ListParams, UserDirectoryService};
use crate::listing::{PageRequest, SortDirection, DEFAULT_PAGE_SIZE};
use crate::messaging::RedisPublisher;

/// Shared application state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub users: UserDirectoryService,
    pub groups: GroupDirectoryService,
    pub publisher: Option<RedisPublisher>,
}

/// Query parameters shared by every paginated listing endpoint.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub sort_by: Option<String>,
    pub sort_direction: Option<String>,
    pub filter: Option<String>,
}

impl ListQuery {
    pub fn into_params(self) -> ListParams {
        ListParams {
            page: PageRequest::new(
                self.page.unwrap_or(0),
                self.size.unwrap_or(DEFAULT_PAGE_SIZE),
            ),
            sort_by: self.sort_by,
            sort_direction: SortDirection::parse(self.sort_direction.as_deref()),
            filter: self.filter,
        }
    }
}

/// Build the full application router.
pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        // Public
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .route("/auth/login", post(auth::login))
        // Protected API
        .merge(api_routes())
        .with_state(state);

    let config = crate::config::config();
    if config.security.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }
    if config.server.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(organization_routes())
        .merge(product_routes())
        .merge(category_routes())
        .merge(account_routes())
        .merge(directory_user_routes())
        .merge(directory_group_routes())
        .route_layer(from_fn(crate::middleware::jwt_auth_middleware))
}

fn organization_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/organizations",
            get(organizations::list).post(organizations::create),
        )
        .route("/api/organizations/search", get(organizations::search))
        .route(
            "/api/organizations/tax/:tax_id",
            get(organizations::get_by_tax_id),
        )
        .route(
            "/api/organizations/:id",
            get(organizations::get)
                .put(organizations::update)
                .delete(organizations::delete),
        )
}

fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(products::list).post(products::create))
        .route("/api/products/search", get(products::search))
        .route("/api/products/in-stock", get(products::in_stock))
        .route("/api/products/under-price", get(products::under_price))
        .route(
            "/api/products/:id",
            get(products::get)
                .put(products::update)
                .delete(products::delete),
        )
}

fn category_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/categories",
            get(categories::list).post(categories::create),
        )
        .route(
            "/api/categories/:id",
            get(categories::get)
                .put(categories::update)
                .delete(categories::delete),
        )
        .route("/api/categories/:id/children", get(categories::children))
}

fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/api/users", get(accounts::list).post(accounts::create))
        .route(
            "/api/users/username/:username",
            get(accounts::get_by_username),
        )
        .route("/api/users/exists/:username", get(accounts::exists))
        .route(
            "/api/users/:id",
            get(accounts::get)
                .put(accounts::update)
                .delete(accounts::delete),
        )
}

fn directory_user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/cognito/users",
            get(directory_users::list).post(directory_users::create),
        )
        .route(
            "/api/cognito/users/:username",
            get(directory_users::get)
                .put(directory_users::update)
                .delete(directory_users::delete),
        )
        .route(
            "/api/cognito/users/:username/enable",
            post(directory_users::enable),
        )
        .route(
            "/api/cognito/users/:username/disable",
            post(directory_users::disable),
        )
        .route(
            "/api/cognito/users/:username/reset-password",
            post(directory_users::reset_password),
        )
        .route(
            "/api/cognito/users/:username/groups",
            get(directory_users::groups),
        )
        .route(
            "/api/cognito/users/:username/groups/:group_name",
            post(directory_users::add_to_group).delete(directory_users::remove_from_group),
        )
}

fn directory_group_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/groups",
            get(directory_groups::list).post(directory_groups::create),
        )
        .route(
            "/api/groups/:group_name",
            get(directory_groups::get)
                .put(directory_groups::update)
                .delete(directory_groups::delete),
        )
        .route(
            "/api/groups/:group_name/users",
            get(directory_groups::users),
        )
        .route(
            "/api/groups/:group_name/users/:username",
            post(directory_groups::add_user).delete(directory_groups::remove_user),
        )
}
