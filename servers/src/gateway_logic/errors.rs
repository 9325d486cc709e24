//! # Command Error Rendering
//!
//! Every failing command handler funnels through `ApiError`, the single
//! error-rendering path. The wire body is always the same envelope:
//! `message` carries the handler's summary, `error` the underlying
//! failure's description. Logging of the same error stays with the
//! handler; rendering here never logs.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use lib_common::auctions::tuple::TupleError;
use serde::Serialize;
use thiserror::Error;

/// Wire-level JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub message: String,
    pub error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// Client-attributable: the request body failed to decode.
    #[error("{message}: {source}")]
    Decode {
        message: String,
        #[source]
        source: TupleError,
    },

    /// A downstream orchestration operation failed; the cause is opaque.
    #[error("{message}: {source}")]
    Orchestration {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl ApiError {
    pub fn decode(message: impl Into<String>, source: TupleError) -> Self {
        Self::Decode {
            message: message.into(),
            source,
        }
    }

    pub fn orchestration(message: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Orchestration {
            message: message.into(),
            source,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Decode { .. } => StatusCode::BAD_REQUEST,
            Self::Orchestration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn envelope(&self) -> ErrorEnvelope {
        let (message, error) = match self {
            Self::Decode { message, source } => (message.clone(), source.to_string()),
            Self::Orchestration { message, source } => (message.clone(), source.to_string()),
        };

        ErrorEnvelope { message, error }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.envelope())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn orchestration_failures_render_500_with_envelope() {
        let err = ApiError::orchestration(
            "could not call download-all-auctions",
            anyhow::anyhow!("downstream exploded"),
        );
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        let object = body.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert_eq!(object["message"], "could not call download-all-auctions");
        assert_eq!(object["error"], "downstream exploded");
    }

    #[tokio::test]
    async fn decode_failures_render_400_with_envelope() {
        let source = lib_common::decode_tuples(b"{bad").unwrap_err();
        let err = ApiError::decode("could not decode tuples", source);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["message"], "could not decode tuples");
        assert!(!body["error"].as_str().unwrap().is_empty());
    }
}
