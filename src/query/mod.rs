//! Server list ping client: resolve, connect, handshake, read, decode.

mod address;
mod connection;

pub use address::{AddressError, ServerAddress};
pub use connection::Connection;

use std::{sync::Arc, time::Duration};

use net::{HandshakeC2s, StatusRequestC2s, DEFAULT_PORT};
use tokio::time::Instant;

use crate::{
    error::QueryError,
    logging::StatusLogger,
    metrics::QueryMetrics,
    status::{decode_status, ServerStatus},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    /// Limit for establishing the TCP connection.
    pub connect_timeout: Duration,
    /// Deadline for everything after connecting, send through final read.
    pub io_timeout: Duration,
    /// Port used when the address has none.
    pub default_port: u16,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            io_timeout: Duration::from_secs(10),
            default_port: DEFAULT_PORT,
        }
    }
}

/// Stateless status client; each query opens and closes its own connection.
#[derive(Debug, Clone, Default)]
pub struct StatusClient {
    options: QueryOptions,
    metrics: Option<Arc<QueryMetrics>>,
}

impl StatusClient {
    pub fn new(options: QueryOptions) -> Self {
        Self {
            options,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<QueryMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Queries `address` (`host` or `host:port`) for its server list status.
    pub async fn query(&self, address: &str) -> Result<ServerStatus, QueryError> {
        let started = Instant::now();
        StatusLogger::query_started(address);
        if let Some(metrics) = &self.metrics {
            metrics.record_attempt();
        }

        let result = self.exchange(address).await;
        let elapsed = started.elapsed();
        match &result {
            Ok(_) => {
                StatusLogger::query_completed(address, elapsed);
                if let Some(metrics) = &self.metrics {
                    metrics.record_duration(elapsed.as_millis() as u64);
                }
            }
            Err(err) => {
                StatusLogger::query_failed(address, err);
                if let Some(metrics) = &self.metrics {
                    metrics.record_failure(err.phase());
                }
            }
        }
        result
    }

    async fn exchange(&self, address: &str) -> Result<ServerStatus, QueryError> {
        let target = ServerAddress::parse_with_default(address, self.options.default_port)
            .map_err(QueryError::resolution)?;
        let resolved = target.resolve().await.map_err(QueryError::resolution)?;
        StatusLogger::address_resolved(&target, &resolved);

        let connect_started = Instant::now();
        let mut conn = Connection::connect(
            resolved,
            self.options.connect_timeout,
            self.options.io_timeout,
        )
        .await?;
        StatusLogger::connected(&resolved, connect_started.elapsed());

        conn.send(&HandshakeC2s::status(target.host(), target.port()))
            .await?;
        conn.send(&StatusRequestC2s).await?;
        StatusLogger::handshake_sent(&resolved);

        let raw = conn.read_status_response().await?;
        StatusLogger::response_received(&resolved, raw.len());
        drop(conn);

        let status = decode_status(&raw)?;
        StatusLogger::decode_complete(&resolved, &status.version.name);
        Ok(status)
    }
}

/// Queries `address` with default timeouts and no metrics.
pub async fn query_status(address: &str) -> Result<ServerStatus, QueryError> {
    StatusClient::default().query(address).await
}
