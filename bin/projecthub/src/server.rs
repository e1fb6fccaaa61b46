//! HTTP serving of the generated documents

use std::{path::Path, sync::Arc};

use axum::{
    Router,
    extract::State,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::services::ServeDir;

/// `Content-Type` of the sitemap.
pub const SITEMAP_CONTENT_TYPE: &str = "application/xml; charset=utf-8";

/// `Content-Type` of robots.txt.
pub const ROBOTS_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Documents rendered for this server's lifetime.
#[derive(Debug, Clone)]
pub struct SiteState {
    /// sitemap.xml body.
    pub sitemap: String,
    /// robots.txt body, when enabled.
    pub robots: Option<String>,
    /// `Cache-Control` value for both documents.
    pub cache_control: HeaderValue,
}

impl SiteState {
    /// Create the server state.
    pub fn new(sitemap: String, robots: Option<String>, max_age_secs: u64) -> Self {
        let cache_control = HeaderValue::from_str(&format!("public, max-age={max_age_secs}"))
            .unwrap_or_else(|_| HeaderValue::from_static("public, max-age=3600"));
        Self {
            sitemap,
            robots,
            cache_control,
        }
    }
}

/// Create the router serving the documents, with `output_dir` as fallback.
pub fn create_router(output_dir: &Path, state: Arc<SiteState>) -> Router {
    Router::new()
        .route("/sitemap.xml", get(sitemap_handler))
        .route("/robots.txt", get(robots_handler))
        .fallback_service(ServeDir::new(output_dir))
        .with_state(state)
}

async fn sitemap_handler(State(state): State<Arc<SiteState>>) -> Response {
    (
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(SITEMAP_CONTENT_TYPE)),
            (header::CACHE_CONTROL, state.cache_control.clone()),
        ],
        state.sitemap.clone(),
    )
        .into_response()
}

async fn robots_handler(State(state): State<Arc<SiteState>>) -> Response {
    let Some(robots) = &state.robots else {
        return StatusCode::NOT_FOUND.into_response();
    };

    (
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(ROBOTS_CONTENT_TYPE)),
            (header::CACHE_CONTROL, state.cache_control.clone()),
        ],
        robots.clone(),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::Request,
    };
    use tower::ServiceExt;

    use super::*;

    fn router(robots: Option<&str>) -> (tempfile::TempDir, Router) {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("index.html"), "<h1>hub</h1>").expect("write");
        let state = SiteState::new(
            "<?xml version=\"1.0\"?>\n<urlset/>".to_string(),
            robots.map(str::to_string),
            3600,
        );
        let router = create_router(dir.path(), Arc::new(state));
        (dir, router)
    }

    async fn get(router: Router, uri: &str) -> Response {
        router
            .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response")
    }

    #[tokio::test]
    async fn test_sitemap_headers() {
        let (_dir, router) = router(None);
        let response = get(router, "/sitemap.xml").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/xml; charset=utf-8"
        );
        assert_eq!(
            response.headers()[header::CACHE_CONTROL],
            "public, max-age=3600"
        );
        let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        assert!(body.starts_with(b"<?xml"));
    }

    #[tokio::test]
    async fn test_robots_headers() {
        let (_dir, router) = router(Some("User-agent: *\n"));
        let response = get(router, "/robots.txt").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
        assert_eq!(
            response.headers()[header::CACHE_CONTROL],
            "public, max-age=3600"
        );
    }

    #[tokio::test]
    async fn test_robots_disabled() {
        let (_dir, router) = router(None);
        let response = get(router, "/robots.txt").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_static_fallback() {
        let (_dir, router) = router(None);
        let response = get(router, "/index.html").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_custom_max_age() {
        let state = SiteState::new(String::new(), None, 60);
        assert_eq!(state.cache_control, "public, max-age=60");
    }
}
