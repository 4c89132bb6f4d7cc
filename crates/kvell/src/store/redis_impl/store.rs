//! Redis store implementation.
//!
//! Every operation sends exactly one command over the shared connection.

use async_trait::async_trait;
use kvell_core::store::validate_key;
use kvell_core::{Result, Store, Ttl};
use redis::aio::ConnectionManager;
use redis::{Cmd, FromRedisValue, RedisResult, Value};

use super::connection::LazyConnection;
use super::error::map_redis_error;
use super::options::RedisOptions;
use super::reply::Reply;

/// Redis-backed store.
///
/// Safe for concurrent use: commands from concurrent callers are multiplexed
/// over one connection, which is re-established if the server drops it.
pub struct RedisStore {
    conn: LazyConnection,
    ttl: Ttl,
}

impl RedisStore {
    /// Creates a store for the server described by `options`.
    ///
    /// No connection is opened until the first operation.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if the connection parameters are invalid.
    pub fn connect(options: RedisOptions) -> Result<Self> {
        let client = redis::Client::open(options.connection_url()).map_err(map_redis_error)?;
        tracing::debug!(host = %options.host, port = options.port, db = options.db, "Created Redis client");
        Ok(Self {
            conn: LazyConnection::new(client, options.reconnect_retries),
            ttl: options.ttl,
        })
    }

    pub fn ttl(&self) -> Ttl {
        self.ttl
    }

    /// Whether the first operation has connected yet.
    pub async fn is_connected(&self) -> bool {
        self.conn.is_connected().await
    }

    async fn query<T: FromRedisValue>(&self, cmd: &Cmd) -> Result<RedisResult<T>> {
        let mut conn: ConnectionManager = self.conn.get().await?;
        Ok(cmd.query_async(&mut conn).await)
    }
}

/// `SET key value [EX seconds]`.
fn set_command(key: &str, value: &[u8], ttl: Ttl) -> Cmd {
    let mut cmd = redis::cmd("SET");
    cmd.arg(key).arg(value);
    if let Some(seconds) = ttl.expire_seconds() {
        cmd.arg("EX").arg(seconds);
    }
    cmd
}

fn get_command(key: &str) -> Cmd {
    let mut cmd = redis::cmd("GET");
    cmd.arg(key);
    cmd
}

fn expire_command(key: &str, seconds: u64) -> Cmd {
    let mut cmd = redis::cmd("EXPIRE");
    cmd.arg(key).arg(seconds);
    cmd
}

fn del_command(key: &str) -> Cmd {
    let mut cmd = redis::cmd("DEL");
    cmd.arg(key);
    cmd
}

#[async_trait]
impl Store for RedisStore {
    async fn health(&self) -> Result<()> {
        let _: String = self
            .query(&redis::cmd("PING"))
            .await?
            .map_err(map_redis_error)?;
        Ok(())
    }

    async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<()> {
        validate_key(key)?;
        self.query::<()>(&set_command(key, &value, self.ttl))
            .await?
            .map_err(map_redis_error)?;

        tracing::debug!(key = %key, "SET");
        Ok(())
    }

    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        validate_key(key)?;
        let reply = match self.query::<Value>(&get_command(key)).await? {
            Ok(value) => Reply::from(value),
            Err(err) => match Reply::from_error(&err) {
                Some(reply) => reply,
                None => return Err(map_redis_error(err)),
            },
        };
        reply.into_payload()
    }

    async fn update_ttl(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        let Some(seconds) = self.ttl.expire_seconds() else {
            return Ok(());
        };

        let updated: i64 = self
            .query(&expire_command(key, seconds))
            .await?
            .map_err(map_redis_error)?;

        if updated == 0 {
            tracing::debug!(key = %key, "TTL refresh skipped, key absent");
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        let _: i64 = self
            .query(&del_command(key))
            .await?
            .map_err(map_redis_error)?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        let was_connected = self.conn.close().await;
        tracing::debug!(was_connected, "Closed Redis connection");
        Ok(())
    }
}
