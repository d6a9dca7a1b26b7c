use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, ErrorKind};
use tokio::sync::OnceCell;
use tracing::debug;

use super::{StatusStore, StoreError};

impl From<redis::RedisError> for StoreError {
    fn from(e: redis::RedisError) -> Self {
        if e.is_io_error() || e.is_connection_refusal() || e.is_connection_dropped() || e.is_timeout() {
            return StoreError::Connection(e.to_string());
        }
        match e.kind() {
            // WRONGTYPE and other server-side codes arrive as ExtensionError
            ErrorKind::TypeError | ErrorKind::ResponseError | ErrorKind::ExtensionError => {
                StoreError::Response(e.to_string())
            }
            _ => StoreError::Connection(e.to_string()),
        }
    }
}

/// Redis-backed store.
///
/// The connection is established on first use and then shared: the
/// `ConnectionManager` multiplexes concurrent commands over one connection and
/// reconnects on its own after the server comes back. A failed first connect
/// leaves the cell empty so the next request tries again.
pub struct RedisStatusStore {
    client: redis::Client,
    conn: OnceCell<ConnectionManager>,
}

impl RedisStatusStore {
    /// Parse the URL without connecting.
    pub fn new(url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(url)?;
        Ok(Self { client, conn: OnceCell::new() })
    }

    async fn connection(&self) -> Result<ConnectionManager, StoreError> {
        let conn = self
            .conn
            .get_or_try_init(|| async {
                debug!("opening redis connection");
                self.client.get_connection_manager().await
            })
            .await?;
        Ok(conn.clone())
    }
}

#[async_trait]
impl StatusStore for RedisStatusStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.connection().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut conn = self.connection().await?;
        conn.set::<_, _, ()>(key, value).await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.connection().await?;
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        debug!(%pong, "redis ping");
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
