//! # Command Router
//!
//! Maps method+path to the fixed command set, logs every request through
//! one middleware, and translates orchestration results into status codes.
//! Unknown method/path combinations fall through to axum's standard
//! not-found/not-allowed behavior.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use lib_common::auctions::tuple::decode_tuples;
use tracing::{error, info};

use crate::gateway_logic::errors::ApiError;
use crate::gateway_logic::state::Orchestrator;

type SharedState = Arc<dyn Orchestrator>;

pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/download-all-auctions", post(download_all_auctions))
        .route("/cleanup-all-manifests", post(cleanup_all_manifests))
        .route("/cleanup-all-auctions", post(cleanup_all_auctions))
        .route("/compute-all-live-auctions", post(compute_all_live_auctions))
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}

// Records method and url for every request, success or failure, before dispatch.
async fn log_requests(request: Request, next: Next) -> Response {
    info!(method = %request.method(), url = %request.uri(), "url hit");
    next.run(request).await
}

// Liveness probe.
async fn index() -> &'static str {
    "Hello, world!"
}

async fn download_all_auctions(State(state): State<SharedState>) -> Result<StatusCode, ApiError> {
    info!("received request");

    if let Err(err) = state.download_all_auctions().await {
        error!(error = %err, "could not call download-all-auctions");
        return Err(ApiError::orchestration(
            "could not call download-all-auctions",
            err,
        ));
    }

    info!("sent response");
    Ok(StatusCode::CREATED)
}

async fn cleanup_all_manifests(State(state): State<SharedState>) -> Result<StatusCode, ApiError> {
    info!("received request");

    if let Err(err) = state.cleanup_all_manifests().await {
        error!(error = %err, "could not call cleanup-all-manifests");
        return Err(ApiError::orchestration(
            "could not call cleanup-all-manifests",
            err,
        ));
    }

    info!("sent response");
    Ok(StatusCode::OK)
}

async fn cleanup_all_auctions(State(state): State<SharedState>) -> Result<StatusCode, ApiError> {
    info!("received request");

    if let Err(err) = state.cleanup_all_auctions().await {
        error!(error = %err, "could not call cleanup-all-auctions");
        return Err(ApiError::orchestration(
            "could not call cleanup-all-auctions",
            err,
        ));
    }

    info!("sent response");
    Ok(StatusCode::OK)
}

async fn compute_all_live_auctions(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    info!("received request");

    let tuples = match decode_tuples(&body) {
        Ok(tuples) => tuples,
        Err(err) => {
            error!(error = %err, "could not decode region-realm-timestamp tuples from request body");
            return Err(ApiError::decode(
                "could not decode region-realm-timestamp tuples from request body",
                err,
            ));
        }
    };

    if let Err(err) = state.compute_all_live_auctions(tuples).await {
        error!(error = %err, "could not call compute-all-live-auctions");
        return Err(ApiError::orchestration(
            "could not call compute-all-live-auctions",
            err,
        ));
    }

    info!("sent response");
    Ok(StatusCode::CREATED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request as HttpRequest;
    use lib_common::auctions::tuple::RegionRealmTimestampTuple;
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tower::ServiceExt;

    #[derive(Default)]
    struct StubOrchestrator {
        fail: bool,
        calls: AtomicUsize,
        computed: Mutex<Vec<Vec<RegionRealmTimestampTuple>>>,
    }

    impl StubOrchestrator {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        fn result(&self) -> anyhow::Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("downstream unavailable");
            }
            Ok(())
        }
    }

    #[async_trait::async_trait]
    impl Orchestrator for StubOrchestrator {
        async fn download_all_auctions(&self) -> anyhow::Result<()> {
            self.result()
        }

        async fn cleanup_all_manifests(&self) -> anyhow::Result<()> {
            self.result()
        }

        async fn cleanup_all_auctions(&self) -> anyhow::Result<()> {
            self.result()
        }

        async fn compute_all_live_auctions(
            &self,
            tuples: Vec<RegionRealmTimestampTuple>,
        ) -> anyhow::Result<()> {
            self.computed.lock().unwrap().push(tuples);
            self.result()
        }
    }

    fn router_with(stub: Arc<StubOrchestrator>) -> Router {
        build_router(stub)
    }

    fn post_request(path: &str, body: &str) -> HttpRequest<Body> {
        HttpRequest::builder()
            .method("POST")
            .uri(path)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    #[tokio::test]
    async fn index_answers_hello_world() {
        let router = router_with(Arc::new(StubOrchestrator::default()));
        let response = router
            .oneshot(
                HttpRequest::builder()
                    .method("GET")
                    .uri("/")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_bytes(response).await, b"Hello, world!");
    }

    #[tokio::test]
    async fn successful_commands_answer_documented_codes_with_empty_bodies() {
        let stub = Arc::new(StubOrchestrator::default());
        let router = router_with(stub.clone());

        let cases = [
            ("/download-all-auctions", StatusCode::CREATED),
            ("/cleanup-all-manifests", StatusCode::OK),
            ("/cleanup-all-auctions", StatusCode::OK),
            ("/compute-all-live-auctions", StatusCode::CREATED),
        ];

        for (path, expected) in cases {
            let response = router.clone().oneshot(post_request(path, "")).await.unwrap();
            assert_eq!(response.status(), expected, "unexpected status for {path}");
            assert!(body_bytes(response).await.is_empty(), "non-empty body for {path}");
        }

        assert_eq!(stub.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn failing_commands_answer_500_with_the_envelope() {
        let router = router_with(Arc::new(StubOrchestrator::failing()));

        let response = router
            .clone()
            .oneshot(post_request("/download-all-auctions", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        let object = body.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert_eq!(object["message"], "could not call download-all-auctions");
        assert!(!object["error"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_compute_body_answers_400_not_500() {
        let stub = Arc::new(StubOrchestrator::default());
        let router = router_with(stub.clone());

        let raw = r#"[{"region":"us","realm":"earthen-ring","timestamp":"soon"}]"#;
        let response = router
            .oneshot(post_request("/compute-all-live-auctions", raw))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        // The orchestration must not have been touched.
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);

        let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert!(!body["message"].as_str().unwrap().is_empty());
        assert!(!body["error"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn compute_preserves_tuple_order() {
        let stub = Arc::new(StubOrchestrator::default());
        let router = router_with(stub.clone());

        let raw = r#"[
            {"region":"eu","realm":"argent-dawn","timestamp":100},
            {"region":"us","realm":"earthen-ring","timestamp":50}
        ]"#;
        let response = router
            .oneshot(post_request("/compute-all-live-auctions", raw))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let computed = stub.computed.lock().unwrap();
        assert_eq!(computed.len(), 1);
        assert_eq!(computed[0][0].region, "eu");
        assert_eq!(computed[0][1].region, "us");
    }

    #[tokio::test]
    async fn concurrent_commands_are_independent() {
        let stub = Arc::new(StubOrchestrator::default());
        let router = router_with(stub.clone());

        let (a, b, c) = tokio::join!(
            router.clone().oneshot(post_request("/download-all-auctions", "")),
            router.clone().oneshot(post_request("/download-all-auctions", "")),
            router.clone().oneshot(post_request("/cleanup-all-auctions", "")),
        );

        assert_eq!(a.unwrap().status(), StatusCode::CREATED);
        assert_eq!(b.unwrap().status(), StatusCode::CREATED);
        assert_eq!(c.unwrap().status(), StatusCode::OK);
        assert_eq!(stub.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn unknown_paths_fall_through_to_404() {
        let router = router_with(Arc::new(StubOrchestrator::default()));
        let response = router
            .oneshot(post_request("/no-such-command", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
