use anyhow::{Context, Result};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, IntoConnectionInfo};

use super::kv::KvBackend;

/// Redis-backed key-value store
///
/// The connection manager multiplexes commands over one connection and
/// reconnects on failure, so clones can be used from any number of tasks.
#[derive(Clone)]
pub struct RedisBackend {
    conn: ConnectionManager,
}

impl RedisBackend {
    /// Connect to Redis and verify the connection with a PING
    pub async fn connect(host: &str, port: u16, password: Option<&str>) -> Result<Self> {
        let mut info = (host, port)
            .into_connection_info()
            .context("Invalid Redis address")?;
        info.redis.password = password.map(str::to_string);

        let client = redis::Client::open(info).context("Failed to create Redis client")?;

        tracing::info!("Connecting to Redis at {}:{}", host, port);
        let conn = ConnectionManager::new(client)
            .await
            .with_context(|| format!("Failed to connect to Redis at {}:{}", host, port))?;

        let backend = Self { conn };
        let pong = backend.ping().await?;
        tracing::info!("Successfully connected to Redis ({})", pong);

        Ok(backend)
    }
}

#[async_trait]
impl KvBackend for RedisBackend {
    async fn ping(&self) -> Result<String> {
        let mut conn = self.conn.clone();
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .context("PING failed")?;
        Ok(pong)
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await.context("GET failed")?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.set(key, value).await.context("SET failed")?;
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<u64> {
        let mut conn = self.conn.clone();
        let removed: u64 = conn.del(key).await.context("DEL failed")?;
        Ok(removed)
    }

    async fn scan(&self, cursor: u64, pattern: &str, count: usize) -> Result<(u64, Vec<String>)> {
        let mut conn = self.conn.clone();
        let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
            .arg(cursor)
            .arg("MATCH")
            .arg(pattern)
            .arg("COUNT")
            .arg(count)
            .query_async(&mut conn)
            .await
            .context("SCAN failed")?;
        Ok((next, keys))
    }
}
