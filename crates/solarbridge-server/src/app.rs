use axum::Router;
use axum::http::{Method, header};
use axum::middleware as axum_mw;
use axum::routing::{any, get, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};

use crate::config::HttpConfig;
use crate::middleware;
use crate::routes;
use crate::state::AppState;

pub fn cors_layer(http: &HttpConfig) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(http.cors_origins.iter().cloned()))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}

/// Assemble the HTTP application: API routes, optional SPA assets, and the
/// middleware stack shared by both.
pub fn build_router(state: AppState, http: &HttpConfig) -> Router {
    let mut app = Router::new()
        .route("/", get(routes::health::root))
        .route("/health", get(routes::health::health_check))
        .route("/api/assessments", get(routes::assessments::list_assessments))
        .route(
            "/api/submit-assessment",
            post(routes::assessments::submit_assessment),
        )
        .route("/api/{*rest}", any(routes::assessments::api_not_found));

    if let Some(dir) = &http.static_dir {
        let spa = ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html")));
        app = app.fallback_service(spa);
    }

    let app = app.layer(axum_mw::from_fn(middleware::audit::audit_log));
    middleware::security::with_security_headers(app)
        .layer(CompressionLayer::new())
        .layer(cors_layer(http))
        .with_state(state)
}
