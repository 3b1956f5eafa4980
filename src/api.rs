// src/api.rs
use shuttle_axum::axum::{routing::get, Router};
use tower_http::cors::CorsLayer;

/// Inbound surface. The scheduled path does the real work; these handlers
/// exist so a caller poking the service gets instructions instead of a
/// surprise pipeline run.
pub fn create_router() -> Router {
    Router::new()
        .route("/", get(instructions))
        .route("/health", get(|| async { "ok" }))
        .layer(CorsLayer::very_permissive())
}

async fn instructions() -> &'static str {
    "arxiv-digest-bot: the digest runs on a timer (DIGEST_INTERVAL_SECS), \
     not per request. Watch the service logs under target `digest` for run \
     reports, or lower the interval locally to trigger a run sooner."
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{Request, StatusCode};
    use shuttle_axum::axum::body::Body;
    use tower::ServiceExt;

    #[tokio::test]
    async fn root_returns_instructions_without_running_the_pipeline() {
        let app = create_router();
        let resp = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = shuttle_axum::axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(body.contains("timer"));
    }

    #[tokio::test]
    async fn health_is_ok() {
        let app = create_router();
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
