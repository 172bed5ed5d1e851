//! Async connection pooling for Diesel PostgreSQL connections.
//!
//! [`DbPool`] wraps `diesel-async` and `bb8`. [`LazyDbPool`] defers building
//! it until the first query so the service starts (and answers health
//! probes) while the database is still coming up.

use std::sync::Arc;
use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};
use tokio::sync::OnceCell;
use tracing::{info, warn};

/// Errors that can occur during pool operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// Failed to check out a connection from the pool.
    #[error("failed to get connection from pool: {message}")]
    Checkout { message: String },

    /// Failed to build the connection pool.
    #[error("failed to build connection pool: {message}")]
    Build { message: String },
}

impl PoolError {
    pub fn checkout(message: impl Into<String>) -> Self {
        Self::Checkout {
            message: message.into(),
        }
    }

    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }
}

/// Configuration for the database connection pool.
///
/// Defaults: 10 connections, no idle minimum, 30 second checkout timeout.
#[derive(Clone)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
    connection_timeout: Duration,
}

impl PoolConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: 10,
            connection_timeout: Duration::from_secs(30),
        }
    }

    /// Set the maximum number of connections in the pool.
    #[must_use]
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    /// Set the connection checkout timeout.
    #[must_use]
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }
}

// The URL embeds credentials.
impl std::fmt::Debug for PoolConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoolConfig")
            .field("database_url", &"<redacted>")
            .field("max_size", &self.max_size)
            .field("connection_timeout", &self.connection_timeout)
            .finish()
    }
}

/// Async connection pool for PostgreSQL via Diesel.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Build a pool with the given configuration.
    ///
    /// # Errors
    /// Returns [`PoolError::Build`] if the pool cannot be constructed.
    pub async fn new(config: &PoolConfig) -> Result<Self, PoolError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_size)
            .min_idle(None)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .await
            .map_err(|err| PoolError::build(err.to_string()))?;

        Ok(Self { inner: pool })
    }

    /// Check out a connection.
    ///
    /// # Errors
    /// Returns [`PoolError::Checkout`] if no connection is available within
    /// the configured timeout.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| PoolError::checkout(err.to_string()))
    }
}

/// A [`DbPool`] built on first use.
///
/// Concurrent first callers share one build attempt. A failed build leaves
/// the cell empty so the next caller retries.
#[derive(Clone)]
pub struct LazyDbPool {
    config: PoolConfig,
    cell: Arc<OnceCell<DbPool>>,
}

impl LazyDbPool {
    #[must_use]
    pub fn new(config: PoolConfig) -> Self {
        Self {
            config,
            cell: Arc::new(OnceCell::new()),
        }
    }

    /// Whether the pool has been built.
    #[must_use]
    pub fn is_initialised(&self) -> bool {
        self.cell.initialized()
    }

    /// Return the pool, building it if this is the first call.
    ///
    /// # Errors
    /// Returns [`PoolError::Build`] when building fails.
    pub async fn pool(&self) -> Result<&DbPool, PoolError> {
        self.cell
            .get_or_try_init(|| async {
                match DbPool::new(&self.config).await {
                    Ok(pool) => {
                        info!(max_size = self.config.max_size, "database pool initialised");
                        Ok(pool)
                    }
                    Err(err) => {
                        warn!(error = %err, "database pool initialisation failed; will retry");
                        Err(err)
                    }
                }
            })
            .await
    }

    /// Check out a connection, building the pool first if needed.
    ///
    /// # Errors
    /// Propagates build and checkout failures.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.pool().await?.get().await
    }
}
