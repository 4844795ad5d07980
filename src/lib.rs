//! A web API for users to keep a list of their favorite campsites.

pub mod api;
pub mod campsite;
pub mod config;
pub(crate) mod crypto;
pub mod db;
pub mod favorite;
pub mod id;
pub mod logging;
pub mod user;

use std::sync::Arc;

use axum_macros::FromRef;
use sqlx::PgPool;

use crate::config::Config;

/// The state shared by all request handlers.
#[derive(FromRef, Clone, Debug)]
pub struct AppState {
    /// The SQLx database pool.
    pub db_pool: PgPool,

    /// The server's configuration.
    pub config: Arc<Config>,
}
