//! # Gateway State
//!
//! Owns the lifecycle of every outbound handle the command handlers rely
//! on. Construction either fully succeeds or returns a typed error; a
//! partially-wired state is unrepresentable. Only the composition root
//! decides whether a bootstrap failure terminates the process.

use std::time::Instant;

use async_trait::async_trait;
use lib_common::auctions::endpoints::{ActEndpoints, EndpointsError};
use lib_common::auctions::tuple::{encode_tuples, RegionRealmTimestampTuple};
use lib_common::connections::bus_redis::{BusHandler, RedisError};
use lib_common::connections::registry_postgres::{RegistryError, RegistryHandler};
use lib_common::connections::storage_http::{BucketHandle, StorageClient, StorageError};
use lib_common::retrieve::act_http::ActClient;
use lib_common::utils::ids::new_instance_id;
use thiserror::Error;
use tracing::{info, warn};

use crate::gateway_logic::metrics::MetricsReporter;

/// Region the storage bases are scoped to.
const STORE_REGION: &str = "us-central1";
/// Game version the realms base is additionally scoped to.
const GAME_VERSION_RETAIL: &str = "retail";

/// Validated bootstrap configuration, composed by the hosting process.
#[derive(Debug, Clone)]
pub struct GatewayStateConfig {
    pub project_id: String,
    pub registry_url: String,
    pub storage_url: String,
    pub messenger_host: String,
    pub messenger_port: u16,
    /// When set, an unreachable message bus aborts bootstrap instead of
    /// degrading the metrics reporter. This is the single policy switch
    /// for the one non-load-bearing dependency.
    pub messenger_fatal: bool,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("failed to connect to the endpoint registry: {0}")]
    Registry(#[from] RegistryError),
    #[error("failed to resolve act endpoints: {0}")]
    Endpoints(#[from] EndpointsError),
    #[error("failed to connect to the message bus at {host}:{port}: {source}")]
    Bus {
        host: String,
        port: u16,
        source: RedisError,
    },
    #[error("failed to connect to object storage: {0}")]
    Storage(#[from] StorageError),
}

/// The orchestration surface the HTTP layer dispatches against.
///
/// Each operation delegates to an opaque downstream collaborator and
/// reports only success or failure. No retries, no dedup of concurrent
/// invocations, no cancellation propagation.
#[async_trait]
pub trait Orchestrator: Send + Sync {
    async fn download_all_auctions(&self) -> anyhow::Result<()>;
    async fn cleanup_all_manifests(&self) -> anyhow::Result<()>;
    async fn cleanup_all_auctions(&self) -> anyhow::Result<()>;
    async fn compute_all_live_auctions(
        &self,
        tuples: Vec<RegionRealmTimestampTuple>,
    ) -> anyhow::Result<()>;
}

/// Process-wide gateway state, immutable after construction and shared
/// read-only across in-flight requests.
#[derive(Debug)]
pub struct GatewayState {
    instance_id: String,
    fresh: bool,
    act_endpoints: ActEndpoints,
    reporter: MetricsReporter,
    boot_bucket: BucketHandle,
    realms_bucket: BucketHandle,
    act: ActClient,
}

impl GatewayState {
    /// Runs the bootstrap sequence, strictly ordered so each step can
    /// fail fast before the next consumes resources.
    pub async fn new(config: GatewayStateConfig) -> Result<Self, BootstrapError> {
        let instance_id = new_instance_id();
        info!(instance_id = instance_id.as_str(), "producing gateway state");

        // Registry and its endpoint snapshot are load-bearing for every command.
        let registry = RegistryHandler::connect(&config.registry_url).await?;
        let act_endpoints = ActEndpoints::from_rows(registry.fetch_act_endpoints().await?)?;

        // The bus only carries metrics. Unless configured otherwise, an
        // unreachable bus degrades the reporter rather than aborting.
        let reporter =
            match BusHandler::connect(&config.messenger_host, config.messenger_port).await {
                Ok(bus) => MetricsReporter::new(bus),
                Err(source) if config.messenger_fatal => {
                    return Err(BootstrapError::Bus {
                        host: config.messenger_host,
                        port: config.messenger_port,
                        source,
                    });
                }
                Err(source) => {
                    warn!(
                        error = %source,
                        host = config.messenger_host.as_str(),
                        port = config.messenger_port,
                        "message bus unreachable, metrics degraded"
                    );
                    MetricsReporter::disconnected()
                }
            };

        let storage = StorageClient::connect(&config.storage_url, &config.project_id).await?;
        let boot_bucket = storage.boot_base(STORE_REGION).firm_bucket().await?;
        let realms_bucket = storage
            .realms_base(STORE_REGION, GAME_VERSION_RETAIL)
            .firm_bucket()
            .await?;

        Ok(Self {
            instance_id,
            fresh: true,
            act_endpoints,
            reporter,
            boot_bucket,
            realms_bucket,
            act: ActClient::new(),
        })
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    pub fn is_fresh(&self) -> bool {
        self.fresh
    }

    pub fn boot_bucket(&self) -> &BucketHandle {
        &self.boot_bucket
    }

    pub fn realms_bucket(&self) -> &BucketHandle {
        &self.realms_bucket
    }

    pub fn metrics_degraded(&self) -> bool {
        self.reporter.is_degraded()
    }

    /// Invokes one act endpoint and reports its duration (best-effort).
    async fn invoke(
        &self,
        operation: &str,
        endpoint: &str,
        body: Option<String>,
    ) -> anyhow::Result<()> {
        let started = Instant::now();

        match body {
            Some(body) => self.act.call_with_body(endpoint, body).await?,
            None => self.act.call(endpoint).await?,
        }

        self.reporter
            .report_duration(operation, started.elapsed())
            .await;

        Ok(())
    }
}

#[async_trait]
impl Orchestrator for GatewayState {
    async fn download_all_auctions(&self) -> anyhow::Result<()> {
        self.invoke(
            "download-all-auctions",
            &self.act_endpoints.download_all_auctions,
            None,
        )
        .await
    }

    async fn cleanup_all_manifests(&self) -> anyhow::Result<()> {
        self.invoke(
            "cleanup-all-manifests",
            &self.act_endpoints.cleanup_all_manifests,
            None,
        )
        .await
    }

    async fn cleanup_all_auctions(&self) -> anyhow::Result<()> {
        self.invoke(
            "cleanup-all-auctions",
            &self.act_endpoints.cleanup_all_auctions,
            None,
        )
        .await
    }

    async fn compute_all_live_auctions(
        &self,
        tuples: Vec<RegionRealmTimestampTuple>,
    ) -> anyhow::Result<()> {
        // An empty target list is a valid no-op; the downstream action is
        // not invoked at all.
        if tuples.is_empty() {
            info!("no tuples supplied, nothing to compute");
            return Ok(());
        }

        let body = encode_tuples(&tuples)?;
        self.invoke(
            "compute-all-live-auctions",
            &self.act_endpoints.compute_all_live_auctions,
            Some(body),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    // An endpoint set that errors immediately if anything dials it.
    fn unroutable_endpoints() -> ActEndpoints {
        ActEndpoints {
            download_all_auctions: "http://127.0.0.1:1/download-all-auctions".to_string(),
            cleanup_all_manifests: "http://127.0.0.1:1/cleanup-all-manifests".to_string(),
            cleanup_all_auctions: "http://127.0.0.1:1/cleanup-all-auctions".to_string(),
            compute_all_live_auctions: "http://127.0.0.1:1/compute-all-live-auctions".to_string(),
        }
    }

    fn bucket(name: &str) -> BucketHandle {
        BucketHandle {
            name: name.to_string(),
            url: Url::parse(&format!("http://storage.local/v1/b/{name}")).unwrap(),
        }
    }

    fn offline_state() -> GatewayState {
        GatewayState {
            instance_id: new_instance_id(),
            fresh: true,
            act_endpoints: unroutable_endpoints(),
            reporter: MetricsReporter::disconnected(),
            boot_bucket: bucket("boot-us-central1"),
            realms_bucket: bucket("realms-us-central1-retail"),
            act: ActClient::new(),
        }
    }

    #[tokio::test]
    async fn compute_with_no_tuples_skips_downstream_work() {
        // The endpoints are unroutable, so any downstream call would fail:
        // success proves nothing was invoked.
        let state = offline_state();
        state.compute_all_live_auctions(Vec::new()).await.unwrap();
    }

    #[tokio::test]
    async fn compute_with_tuples_requires_the_downstream_action() {
        let state = offline_state();
        let tuples = vec![RegionRealmTimestampTuple {
            region: "us".to_string(),
            realm: "earthen-ring".to_string(),
            timestamp: 1_546_300_800,
        }];

        assert!(state.compute_all_live_auctions(tuples).await.is_err());
    }

    #[tokio::test]
    async fn bootstrap_fails_against_an_unreachable_registry() {
        let config = GatewayStateConfig {
            project_id: "test-project".to_string(),
            registry_url: "postgres://gateway@127.0.0.1:1/acts".to_string(),
            storage_url: "http://127.0.0.1:1/v1".to_string(),
            messenger_host: "127.0.0.1".to_string(),
            messenger_port: 1,
            messenger_fatal: false,
        };

        let err = GatewayState::new(config).await.unwrap_err();
        assert!(matches!(err, BootstrapError::Registry(_)));
    }
}
