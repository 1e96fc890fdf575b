//! Pooled connection access for the `PostgreSQL` adapters.
//!
//! Every adapter operation goes through one of two wrappers:
//!
//! - [`ConnectionGateway::dispatch`] offloads the closure to the blocking
//!   thread pool so synchronous Diesel calls never stall the async executor.
//! - [`ConnectionGateway::with_connection`] runs the closure on the caller's
//!   thread, for maintenance work and renewal streaming whose callers already
//!   expect to block.
//!
//! Both check out exactly one pooled connection and return it when the
//! closure finishes, on every exit path.

use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use tracing::{debug, instrument};

use super::error::{StorageError, StorageResult};
use crate::config::{ConfigError, EngineKind, StorageConfig};

/// `PostgreSQL` connection pool type.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Pooled connection type for internal use.
type PooledConn = PooledConnection<ConnectionManager<PgConnection>>;

/// Errors raised while building a gateway from configuration.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The configuration is incomplete or names an unsupported engine.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The pool could not be initialised.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Process-wide access point to the relational store.
#[derive(Debug, Clone)]
pub struct ConnectionGateway {
    pool: PgPool,
}

impl ConnectionGateway {
    /// Wraps an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Builds a pool sized by the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] when the configuration is invalid or
    /// names an engine without a pooled adapter, and
    /// [`GatewayError::Storage`] when the pool cannot reach the server.
    #[instrument(skip_all, fields(engine = %config.engine, database = %config.database))]
    pub fn connect(config: &StorageConfig) -> Result<Self, GatewayError> {
        let validated = config.clone().validate()?;
        if validated.engine != EngineKind::Postgres {
            return Err(ConfigError::UnsupportedEngine(validated.engine).into());
        }

        let manager = ConnectionManager::<PgConnection>::new(validated.database_url()?);
        let pool = Pool::builder()
            .max_size(validated.pool_size())
            .build(manager)
            .map_err(StorageError::from)?;
        debug!(pool_size = validated.pool_size(), "connection pool ready");
        Ok(Self::new(pool))
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs `f` with a pooled connection on the current thread.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Connection`] when no connection can be
    /// checked out, or whatever `f` returns.
    pub fn with_connection<F, T>(&self, f: F) -> StorageResult<T>
    where
        F: FnOnce(&mut PgConnection) -> StorageResult<T>,
    {
        let mut connection = get_conn(&self.pool)?;
        f(&mut connection)
    }

    /// Runs `f` with a pooled connection on the blocking thread pool.
    ///
    /// The work is not cancelled if the returned future is dropped; the
    /// connection is returned to the pool once `f` completes.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Connection`] when no connection can be
    /// checked out or the blocking task fails, or whatever `f` returns.
    pub async fn dispatch<F, T>(&self, f: F) -> StorageResult<T>
    where
        F: FnOnce(&mut PgConnection) -> StorageResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        run_blocking(move || {
            let mut connection = get_conn(&pool)?;
            f(&mut connection)
        })
        .await
    }
}

/// Runs a blocking operation on the dedicated thread pool.
async fn run_blocking<F, T>(f: F) -> StorageResult<T>
where
    F: FnOnce() -> StorageResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| StorageError::connection(format!("task join error: {e}")))?
}

/// Obtains a connection from the pool.
fn get_conn(pool: &PgPool) -> StorageResult<PooledConn> {
    pool.get().map_err(StorageError::from)
}
