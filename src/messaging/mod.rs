use chrono::{DateTime, Utc};
use futures::StreamExt;
use redis::{aio::ConnectionManager, AsyncCommands};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum MessagingError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Domain event published on the configured Redis channel after write
/// operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    pub event: String,
    pub detail: Value,
    pub timestamp: DateTime<Utc>,
}

impl DomainEvent {
    pub fn new(event: impl Into<String>, detail: Value) -> Self {
        Self {
            event: event.into(),
            detail,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Clone)]
pub struct RedisPublisher {
    conn: ConnectionManager,
    channel: String,
}

impl fmt::Debug for RedisPublisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisPublisher")
            .field("channel", &self.channel)
            .field("connection", &"ConnectionManager")
            .finish()
    }
}

impl RedisPublisher {
    pub async fn connect(redis_url: &str, channel: &str) -> Result<Self, MessagingError> {
        info!("Connecting to Redis at {}", redis_url);

        let client = redis::Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;

        info!("Connected to Redis, publishing on channel '{}'", channel);

        Ok(Self {
            conn,
            channel: channel.to_string(),
        })
    }

    pub async fn publish(&self, event: &DomainEvent) -> Result<(), MessagingError> {
        let payload = serde_json::to_string(event)?;
        let mut conn = self.conn.clone();
        conn.publish::<_, _, ()>(&self.channel, payload).await?;
        Ok(())
    }

    /// Fire-and-forget variant used from request handlers. A broker outage
    /// must not fail the write that triggered the event.
    pub async fn publish_best_effort(&self, event: DomainEvent) {
        if let Err(e) = self.publish(&event).await {
            warn!("Failed to publish event '{}': {}", event.event, e);
        }
    }
}

/// Subscribes to the event channel and logs every message. Runs until the
/// connection drops, so callers should spawn it as a background task.
pub async fn run_subscriber(redis_url: &str, channel: &str) -> Result<(), MessagingError> {
    let client = redis::Client::open(redis_url)?;
    let mut pubsub = client.get_async_pubsub().await?;
    pubsub.subscribe(channel).await?;

    info!("Subscribed to Redis channel '{}'", channel);

    let mut stream = pubsub.on_message();
    while let Some(message) = stream.next().await {
        match message.get_payload::<String>() {
            Ok(payload) => info!("Received message on '{}': {}", channel, payload),
            Err(e) => error!("Failed to read message payload: {}", e),
        }
    }

    warn!("Redis subscription on '{}' ended", channel);
    Ok(())
}
