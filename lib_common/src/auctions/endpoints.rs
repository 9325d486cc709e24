//! # Act Endpoint Mapping
//!
//! The endpoint registry stores one invocation URL per logical action name.
//! The mapping is fetched once during bootstrap and is read-only afterwards.

use std::collections::HashMap;

use thiserror::Error;

pub const ACTION_DOWNLOAD_ALL_AUCTIONS: &str = "download-all-auctions";
pub const ACTION_CLEANUP_ALL_MANIFESTS: &str = "cleanup-all-manifests";
pub const ACTION_CLEANUP_ALL_AUCTIONS: &str = "cleanup-all-auctions";
pub const ACTION_COMPUTE_ALL_LIVE_AUCTIONS: &str = "compute-all-live-auctions";

#[derive(Debug, Error)]
pub enum EndpointsError {
    #[error("no endpoint registered for action {0}")]
    MissingAction(&'static str),
}

/// Immutable mapping from logical action name to invocation target.
#[derive(Debug, Clone)]
pub struct ActEndpoints {
    pub download_all_auctions: String,
    pub cleanup_all_manifests: String,
    pub cleanup_all_auctions: String,
    pub compute_all_live_auctions: String,
}

impl ActEndpoints {
    /// Builds the mapping from raw registry rows, failing if any of the
    /// four gateway actions is absent.
    pub fn from_rows(mut rows: HashMap<String, String>) -> Result<Self, EndpointsError> {
        let mut take = |action: &'static str| {
            rows.remove(action)
                .ok_or(EndpointsError::MissingAction(action))
        };

        Ok(Self {
            download_all_auctions: take(ACTION_DOWNLOAD_ALL_AUCTIONS)?,
            cleanup_all_manifests: take(ACTION_CLEANUP_ALL_MANIFESTS)?,
            cleanup_all_auctions: take(ACTION_CLEANUP_ALL_AUCTIONS)?,
            compute_all_live_auctions: take(ACTION_COMPUTE_ALL_LIVE_AUCTIONS)?,
        })
    }
}
