//! All routes for the HTTP API.

use axum::{
    routing::{get, post},
    Router,
};
use tower_cookies::CookieManagerLayer;

use crate::{
    api::{self, cors},
    logging, AppState,
};

pub mod v1 {
    //! The routes for version 1 of the HTTP API.

    pub mod campsites;
    pub mod favorites;
    pub mod sessions;
    pub mod users;
}

/// Builds the API router with all its middleware.
pub fn router(state: AppState) -> Router {
    let cors = cors::whitelisted(&state.config);

    Router::new()
        .route(
            "/api/v1/campsites",
            get(v1::campsites::get)
                .post(v1::campsites::post)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/v1/campsites/:campsite_id",
            get(v1::campsites::campsite::get).fallback(method_not_allowed),
        )
        .route(
            "/api/v1/favorites",
            get(v1::favorites::get)
                .post(v1::favorites::post)
                .put(v1::favorites::put)
                .delete(v1::favorites::delete)
                .options(v1::favorites::options)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/v1/favorites/:campsite_id",
            get(v1::favorites::campsite::get)
                .post(v1::favorites::campsite::post)
                .put(v1::favorites::campsite::put)
                .delete(v1::favorites::campsite::delete)
                .options(v1::favorites::campsite::options)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/v1/sessions",
            post(v1::sessions::post)
                .delete(v1::sessions::delete)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/v1/users",
            post(v1::users::post).fallback(method_not_allowed),
        )
        .fallback(|| async { api::Error::RouteNotFound })
        .layer(CookieManagerLayer::new())
        .layer(cors)
        .layer(logging::layer!())
        .with_state(state)
}

/// Answers requests to an existing route with an HTTP method it doesn't handle.
#[expect(clippy::unused_async, reason = "Axum fallbacks must be async")]
async fn method_not_allowed() -> api::Error {
    api::Error::MethodNotAllowed
}
