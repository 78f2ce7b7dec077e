use std::sync::Arc;

use eb2c_api::config;
use eb2c_api::database;
use eb2c_api::directory::{CognitoDirectoryStore, GroupDirectoryService, UserDirectoryService};
use eb2c_api::handlers::{build_router, AppState};
use eb2c_api::messaging::{self, RedisPublisher};
use eb2c_api::services::bootstrap;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, COGNITO_USER_POOL_ID, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    info!("Starting eb2c API in {:?} mode", config.environment);

    let pool = database::connect()?;
    if config.database.run_migrations {
        database::migrate(&pool).await?;
    }
    if config.database.bootstrap_data {
        bootstrap::seed(&pool).await?;
    }

    let store = Arc::new(CognitoDirectoryStore::from_env(&config.cognito.user_pool_id).await);
    let users = UserDirectoryService::new(store.clone());
    let groups = GroupDirectoryService::new(store);

    let publisher = if config.redis.enabled {
        match RedisPublisher::connect(&config.redis.url, &config.redis.channel).await {
            Ok(publisher) => {
                let url = config.redis.url.clone();
                let channel = config.redis.channel.clone();
                tokio::spawn(async move {
                    if let Err(e) = messaging::run_subscriber(&url, &channel).await {
                        error!("Redis subscriber failed: {}", e);
                    }
                });
                Some(publisher)
            }
            Err(e) => {
                warn!("Redis unavailable, events disabled: {}", e);
                None
            }
        }
    } else {
        None
    };

    let state = AppState {
        pool,
        users,
        groups,
        publisher,
    };
    let app = build_router(state);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    info!("eb2c API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
