//! # Act Invocation Client
//!
//! Invokes downstream act endpoints over HTTP. Calls are fire-and-forget
//! relative to the caller's response handling: the client blocks until the
//! downstream answers and reports only success or an opaque failure. There
//! is deliberately no retry policy at this layer; retries belong to the
//! downstream collaborator.

use reqwest::header::CONTENT_TYPE;
use thiserror::Error;
use url::Url;

/// Errors surfaced by act endpoint invocations.
#[derive(Debug, Error)]
pub enum ActError {
    #[error("invalid act endpoint URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("act call transport failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("act call failed with status {status}: {body}")]
    Failed { status: u16, body: String },
}

/// An HTTP client for act endpoint invocations.
#[derive(Debug, Clone)]
pub struct ActClient {
    http: reqwest::Client,
}

impl Default for ActClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ActClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// Invokes an endpoint with no request body.
    pub async fn call(&self, endpoint: &str) -> Result<(), ActError> {
        let url = Url::parse(endpoint)?;
        let response = self.http.post(url).send().await?;
        Self::check(response).await
    }

    /// Invokes an endpoint with a pre-encoded JSON request body.
    pub async fn call_with_body(&self, endpoint: &str, body: String) -> Result<(), ActError> {
        let url = Url::parse(endpoint)?;
        let response = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;
        Self::check(response).await
    }

    async fn check(response: reqwest::Response) -> Result<(), ActError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(ActError::Failed {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rejects_malformed_endpoint_urls() {
        let client = ActClient::new();
        let err = client.call("not a url").await.unwrap_err();
        assert!(matches!(err, ActError::Url(_)));
    }
}
