//! Router configuration: the query API plus the static UI bundle.

use axum::{
    routing::{get, post},
    Router,
};
use std::path::Path;
use tower_http::{services::ServeDir, trace::TraceLayer};

use super::handlers;
use super::state::AppState;

/// Create the application router. Anything that is not an API route is
/// served from `static_dir`.
pub fn create_router(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/query", post(handlers::query))
        .route("/health", get(handlers::health_check))
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::resolver::{QueryFuture, ServerQuery};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use qgate_core::{parse_reply, GatewayError, Locale};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    enum Outcome {
        Stdout(&'static str),
        Subprocess(&'static str),
        Timeout,
    }

    struct FakeResolver {
        outcome: Outcome,
        calls: AtomicUsize,
    }

    impl FakeResolver {
        fn new(outcome: Outcome) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl ServerQuery for FakeResolver {
        fn query<'a>(&'a self, _ip: &'a str, _port: &'a str) -> QueryFuture<'a> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let result = match self.outcome {
                Outcome::Stdout(stdout) => parse_reply(stdout),
                Outcome::Subprocess(stderr) => Err(GatewayError::Subprocess(stderr.to_string())),
                Outcome::Timeout => Err(GatewayError::Timeout(Duration::from_secs(15))),
            };
            Box::pin(async move { result })
        }
    }

    fn app(resolver: Arc<FakeResolver>, locale: Locale) -> Router {
        create_router(
            AppState::new(resolver, locale),
            Path::new("/nonexistent/qgate-static"),
        )
    }

    async fn post_query(app: Router, body: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("POST")
            .uri("/query")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_query_success_renders_report() {
        let resolver = FakeResolver::new(Outcome::Stdout(
            r#"{"ip":"1.2.3.4","port":27015,"name":"Test","server_type":"d","version":"1.2\u00013\u0002"}"#,
        ));
        let (status, body) =
            post_query(app(resolver.clone(), Locale::En), r#"{"ip":"1.2.3.4","port":"27015"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Server Type: dedicated\n"), "{body}");
        assert!(body.contains("Version: 1.23\n"), "{body}");
        assert!(body.contains("Map: unknown\n"), "{body}");
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_numeric_port_accepted() {
        let resolver = FakeResolver::new(Outcome::Stdout(r#"{"name":"x"}"#));
        let (status, _) =
            post_query(app(resolver, Locale::En), r#"{"ip":"1.2.3.4","port":27015}"#).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_fields_are_client_errors() {
        for body in [r#"{"port":"27015"}"#, r#"{"ip":"1.2.3.4"}"#, r#"{"ip":"  ","port":"1"}"#, "{}"] {
            let resolver = FakeResolver::new(Outcome::Stdout("{}"));
            let (status, text) = post_query(app(resolver.clone(), Locale::En), body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body {body}");
            assert!(text.contains("missing field"), "{text}");
            assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);
        }
    }

    #[tokio::test]
    async fn test_domain_error_is_server_error() {
        let resolver = FakeResolver::new(Outcome::Stdout(r#"{"error":"timeout"}"#));
        let (status, body) =
            post_query(app(resolver, Locale::En), r#"{"ip":"1.2.3.4","port":"27015"}"#).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("timeout"));
        assert!(!body.contains("Server Info"));
    }

    #[tokio::test]
    async fn test_parse_error_is_distinct() {
        let resolver = FakeResolver::new(Outcome::Stdout("Traceback (most recent call last):"));
        let (status, body) =
            post_query(app(resolver, Locale::En), r#"{"ip":"1.2.3.4","port":"27015"}"#).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.starts_with("parse error"), "{body}");
    }

    #[tokio::test]
    async fn test_subprocess_error_carries_stderr() {
        let resolver = FakeResolver::new(Outcome::Subprocess("python: can't open file 'server.py'"));
        let (status, body) =
            post_query(app(resolver, Locale::En), r#"{"ip":"1.2.3.4","port":"27015"}"#).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "python: can't open file 'server.py'");
    }

    #[tokio::test]
    async fn test_timeout_is_gateway_timeout() {
        let resolver = FakeResolver::new(Outcome::Timeout);
        let (status, body) =
            post_query(app(resolver, Locale::En), r#"{"ip":"1.2.3.4","port":"27015"}"#).await;
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert!(body.contains("timed out"));
    }

    #[tokio::test]
    async fn test_chinese_locale() {
        let resolver = FakeResolver::new(Outcome::Stdout(r#"{"server_type":"l"}"#));
        let (_, body) =
            post_query(app(resolver, Locale::ZhCn), r#"{"ip":"1.2.3.4","port":"27015"}"#).await;
        assert!(body.contains("服务器类型: 监听服务器"), "{body}");
    }

    #[tokio::test]
    async fn test_health() {
        let resolver = FakeResolver::new(Outcome::Stdout("{}"));
        let response = app(resolver, Locale::En)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_static_bundle_served_at_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<title>terminal</title>").unwrap();
        let router = create_router(
            AppState::new(FakeResolver::new(Outcome::Stdout("{}")), Locale::En),
            dir.path(),
        );
        let response = router
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"<title>terminal</title>");
    }
}
