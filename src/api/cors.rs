//! CORS middleware.

use axum::http::{header, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::Config;

/// Creates a CORS layer allowing credentialed requests (which carry the session cookie) from the
/// configured origins.
pub fn whitelisted(config: &Config) -> CorsLayer {
    CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_credentials(true)
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(AllowOrigin::list(config.allowed_origins.iter().cloned()))
}
