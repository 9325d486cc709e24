//! # Endpoint Registry Connection
//!
//! The durable endpoint registry is a PostgreSQL table mapping logical
//! action names to invocation URLs. The gateway reads it exactly once at
//! bootstrap; the pool is kept around only as a connection handle.

use std::collections::HashMap;

use deadpool_postgres::{
    Config as DeadpoolConfig, ManagerConfig, Pool, RecyclingMethod, Runtime,
};
use thiserror::Error;
use tokio_postgres::NoTls;
use tracing::debug;

/// Custom error types for registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to create registry pool: {0}")]
    CreatePool(#[from] deadpool_postgres::CreatePoolError),
    #[error("failed to get registry connection from pool: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),
    #[error("registry query failed: {0}")]
    Query(#[from] tokio_postgres::Error),
}

/// A handler for the endpoint registry database.
pub struct RegistryHandler {
    pool: Pool,
}

impl RegistryHandler {
    /// Connects to the registry and verifies reachability.
    ///
    /// The pool itself is lazy, so a throwaway `SELECT 1` forces an actual
    /// connection and lets bootstrap fail fast on an unreachable registry.
    pub async fn connect(url: &str) -> Result<Self, RegistryError> {
        let mut cfg = DeadpoolConfig::new();
        cfg.url = Some(url.to_string());
        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast, // Recommended for tokio-postgres
        });

        let pool = cfg.create_pool(Some(Runtime::Tokio1), NoTls)?;

        let client = pool.get().await?;
        client.simple_query("SELECT 1").await?;
        debug!("registry connection verified");

        Ok(Self { pool })
    }

    /// Fetches the full action-name to endpoint-URL mapping.
    pub async fn fetch_act_endpoints(&self) -> Result<HashMap<String, String>, RegistryError> {
        let client = self.pool.get().await?;
        let rows = client
            .query("SELECT action, endpoint FROM act_endpoints", &[])
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let action: String = row.get(0);
                let endpoint: String = row.get(1);
                (action, endpoint)
            })
            .collect())
    }
}
