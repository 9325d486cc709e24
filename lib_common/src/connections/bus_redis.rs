//! # Message Bus Connection
//!
//! A thin asynchronous wrapper over a Redis pub/sub connection. The bus is
//! best-effort transport for metrics; callers decide whether a connection
//! failure is fatal.

use redis::{aio::ConnectionManager, AsyncCommands, Client};
use tracing::debug;

pub use redis::RedisError;

/// A handler for message bus interactions.
///
/// Clones share one multiplexed connection, so the handler is safe to use
/// from concurrent request tasks without extra locking.
#[derive(Debug, Clone)]
pub struct BusHandler {
    manager: ConnectionManager,
}

impl BusHandler {
    /// Connects to the bus at the given host and port.
    ///
    /// The connection manager dials eagerly, so an unreachable bus is
    /// reported here rather than on first publish.
    pub async fn connect(host: &str, port: u16) -> Result<Self, RedisError> {
        let client = Client::open(format!("redis://{host}:{port}/"))?;
        let manager = client.get_connection_manager().await?;
        debug!(host, port, "bus connection established");

        Ok(Self { manager })
    }

    /// Publishes a payload on the given subject.
    pub async fn publish(&self, subject: &str, payload: &str) -> Result<(), RedisError> {
        let mut conn = self.manager.clone();
        let _: () = conn.publish(subject, payload).await?;
        Ok(())
    }

    /// Round-trips a PING to verify the connection is still alive.
    pub async fn ping(&self) -> Result<(), RedisError> {
        let mut conn = self.manager.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}
