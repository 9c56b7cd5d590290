//! Visit counter backends.
//!
//! The service never caches the count. Each visit asks the backend to
//! increment and report the new value in one step.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::error::{Error, ServiceError};

/// Counter name used when none is configured.
pub const DEFAULT_COUNTER_KEY: &str = "hits";

const CONNECT_RETRIES: usize = 1;

/// An external store holding one atomic counter.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Adds 1 to the counter and returns the new value.
    ///
    /// Fails with [`ServiceError::BackendUnavailable`] when the store cannot
    /// be reached.
    async fn increment_and_get(&self) -> Result<i64, ServiceError>;
}

/// Redis-backed counter (`INCR <key>`).
///
/// The connection is opened on the first visit and kept in a
/// [`ConnectionManager`], which reconnects on its own after Redis restarts.
/// The caller bounds every visit with a timeout.
pub struct RedisCounter {
    client: redis::Client,
    key: String,
    manager: OnceCell<ConnectionManager>,
}

impl RedisCounter {
    /// Validates `url` and prepares a client. No connection is made yet.
    pub fn open(url: &str, key: impl Into<String>) -> Result<Self, Error> {
        let client = redis::Client::open(url).map_err(|e| Error::Backend(e.to_string()))?;
        Ok(Self { client, key: key.into(), manager: OnceCell::new() })
    }

    async fn connection(&self) -> Result<ConnectionManager, ServiceError> {
        self.manager
            .get_or_try_init(|| {
                let config = ConnectionManagerConfig::new().set_number_of_retries(CONNECT_RETRIES);
                ConnectionManager::new_with_config(self.client.clone(), config)
            })
            .await
            .cloned()
            .map_err(|e| {
                warn!(error = %e, "redis connect failed");
                ServiceError::BackendUnavailable(e.to_string())
            })
    }
}

#[async_trait]
impl CounterStore for RedisCounter {
    async fn increment_and_get(&self) -> Result<i64, ServiceError> {
        let mut conn = self.connection().await?;

        let value: i64 = redis::cmd("INCR")
            .arg(&self.key)
            .query_async(&mut conn)
            .await
            .map_err(|e| {
                warn!(key = %self.key, error = %e, "redis INCR failed");
                ServiceError::BackendUnavailable(e.to_string())
            })?;

        debug!(key = %self.key, value, "counter incremented");
        Ok(value)
    }
}

/// Process-local counter for tests and for running without Redis.
#[derive(Debug, Default)]
pub struct MemoryCounter {
    value: AtomicI64,
}

impl MemoryCounter {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CounterStore for MemoryCounter {
    async fn increment_and_get(&self) -> Result<i64, ServiceError> {
        Ok(self.value.fetch_add(1, Ordering::SeqCst) + 1)
    }
}
