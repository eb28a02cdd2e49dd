//! Shared application state for all routes.

use crate::error::AppError;
use sqlx::mysql::MySql;
use sqlx::pool::PoolConnection;
use sqlx::MySqlPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: MySqlPool,
}

impl AppState {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Take one connection for the duration of a request. It returns to the pool
    /// when the guard drops, whichever way the handler exits.
    pub async fn acquire(&self) -> Result<PoolConnection<MySql>, AppError> {
        self.pool.acquire().await.map_err(|e| {
            tracing::error!(error = %e, "database connection failed");
            AppError::Unavailable(e)
        })
    }
}
