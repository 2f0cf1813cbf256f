use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{InvalidHeaderValue, AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, ORIGIN},
        HeaderValue, Method,
    },
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers;
use crate::AppState;

/// How long browsers may cache a preflight response
const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(12 * 60 * 60);

/// CORS for the single frontend origin, with credentials.
///
/// Requests from any other origin get no `access-control-allow-origin`.
pub fn cors_layer(frontend_origin: &str) -> Result<CorsLayer, InvalidHeaderValue> {
    let origin = frontend_origin.parse::<HeaderValue>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list([origin]))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([ORIGIN, CONTENT_TYPE, AUTHORIZATION])
        .expose_headers([CONTENT_LENGTH])
        .allow_credentials(true)
        .max_age(PREFLIGHT_MAX_AGE))
}

pub fn router(state: AppState, cors: CorsLayer, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/admin/post-submit", post(handlers::submit::post_submit))
        .route("/admin/posts", get(handlers::list::fetch_posts))
        // over-limit bodies surface as multipart errors inside the handler
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
