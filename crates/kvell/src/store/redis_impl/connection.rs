//! Lazily established, self-healing Redis connection.
//!
//! Wraps `redis::aio::ConnectionManager`, which multiplexes concurrent
//! commands over one connection and transparently reconnects after the
//! server drops it. The manager is only created on first use.

use kvell_core::{Result, StoreError};
use redis::aio::ConnectionManager;
use tokio::sync::Mutex;

use super::error::map_redis_error;

/// Exponential backoff between reconnect attempts: `factor * base^n` ms.
const BACKOFF_EXPONENT_BASE: u64 = 2;
const BACKOFF_FACTOR_MILLIS: u64 = 100;

enum State {
    Idle,
    Connected(ConnectionManager),
    Closed,
}

/// Redis connection shared by every operation of a store.
pub struct LazyConnection {
    client: redis::Client,
    reconnect_retries: usize,
    state: Mutex<State>,
}

impl LazyConnection {
    pub fn new(client: redis::Client, reconnect_retries: usize) -> Self {
        Self {
            client,
            reconnect_retries,
            state: Mutex::new(State::Idle),
        }
    }

    /// Returns a handle to the shared connection, connecting on first use.
    ///
    /// Handles are cheap clones; dropping one releases nothing but the handle.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` after `close`, or if connecting fails.
    pub async fn get(&self) -> Result<ConnectionManager> {
        let mut state = self.state.lock().await;
        match &*state {
            State::Connected(conn) => return Ok(conn.clone()),
            State::Closed => {
                return Err(StoreError::Backend(
                    "Redis connection is closed".to_string(),
                ))
            }
            State::Idle => {}
        }

        let conn = ConnectionManager::new_with_backoff(
            self.client.clone(),
            BACKOFF_EXPONENT_BASE,
            BACKOFF_FACTOR_MILLIS,
            self.reconnect_retries,
        )
        .await
        .map_err(map_redis_error)?;
        tracing::debug!("Connected to Redis");

        *state = State::Connected(conn.clone());
        Ok(conn)
    }

    /// Drops the shared connection and rejects later `get` calls.
    ///
    /// Returns whether a connection had been established.
    pub async fn close(&self) -> bool {
        let mut state = self.state.lock().await;
        matches!(
            std::mem::replace(&mut *state, State::Closed),
            State::Connected(_)
        )
    }

    pub async fn is_connected(&self) -> bool {
        matches!(&*self.state.lock().await, State::Connected(_))
    }
}
