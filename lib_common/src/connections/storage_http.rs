//! # Object Storage Connection
//!
//! Client for the object-storage tier's HTTP API. Buckets are resolved
//! through region-scoped bases; "firm" resolution requires the bucket to
//! already exist, mirroring the fail-fast bootstrap contract.

use reqwest::StatusCode;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Custom error types for storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid storage URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("storage request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("storage backend answered {status} to reachability check")]
    Unreachable { status: StatusCode },
    #[error("firm bucket {0} does not exist")]
    FirmBucketMissing(String),
}

/// A resolved, existence-checked bucket.
#[derive(Debug, Clone)]
pub struct BucketHandle {
    pub name: String,
    pub url: Url,
}

/// A client for the object-storage backend, scoped to one tenant project.
#[derive(Clone)]
pub struct StorageClient {
    http: reqwest::Client,
    base_url: Url,
    project_id: String,
}

impl StorageClient {
    /// Connects to the storage backend and verifies reachability for the
    /// given project before handing the client out.
    pub async fn connect(base_url: &str, project_id: &str) -> Result<Self, StorageError> {
        // Url::join treats a base without a trailing slash as a file, so
        // normalize before parsing.
        let mut raw = base_url.to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }

        let client = Self {
            http: reqwest::Client::new(),
            base_url: Url::parse(&raw)?,
            project_id: project_id.to_string(),
        };
        client.ping().await?;
        debug!(project_id, "storage connection verified");

        Ok(client)
    }

    /// Lists buckets for the project as a reachability check.
    pub async fn ping(&self) -> Result<(), StorageError> {
        let mut url = self.base_url.join("b")?;
        url.query_pairs_mut().append_pair("project", &self.project_id);

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StorageError::Unreachable { status });
        }

        Ok(())
    }

    /// Returns the region-scoped base for boot artifacts.
    pub fn boot_base(&self, region: &str) -> BucketBase {
        BucketBase {
            client: self.clone(),
            name: format!("boot-{region}"),
        }
    }

    /// Returns the region- and game-version-scoped base for realm artifacts.
    pub fn realms_base(&self, region: &str, game_version: &str) -> BucketBase {
        BucketBase {
            client: self.clone(),
            name: format!("realms-{region}-{game_version}"),
        }
    }
}

/// A scoped base abstraction from which a concrete bucket is resolved.
#[derive(Clone)]
pub struct BucketBase {
    client: StorageClient,
    name: String,
}

impl BucketBase {
    /// The bucket name this base resolves to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolves the bucket, requiring it to already exist.
    pub async fn firm_bucket(&self) -> Result<BucketHandle, StorageError> {
        let url = self.client.base_url.join(&format!("b/{}", self.name))?;

        let response = self.client.http.head(url.clone()).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(StorageError::FirmBucketMissing(self.name.clone()));
        }
        if !status.is_success() {
            return Err(StorageError::Unreachable { status });
        }
        debug!(bucket = self.name.as_str(), "firm bucket resolved");

        Ok(BucketHandle {
            name: self.name.clone(),
            url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> StorageClient {
        StorageClient {
            http: reqwest::Client::new(),
            base_url: Url::parse("http://storage.local/v1/").unwrap(),
            project_id: "test-project".to_string(),
        }
    }

    #[test]
    fn boot_base_is_region_scoped() {
        assert_eq!(client().boot_base("us-central1").name(), "boot-us-central1");
    }

    #[test]
    fn realms_base_is_region_and_game_version_scoped() {
        assert_eq!(
            client().realms_base("us-central1", "retail").name(),
            "realms-us-central1-retail"
        );
    }
}
