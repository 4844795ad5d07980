//! The set of all campsites.

use axum::{extract::State, http::StatusCode};
use axum_macros::debug_handler;
use chrono::Utc;
use serde::Deserialize;

use crate::{
    api::{
        self,
        auth::AuthUser,
        validation::{CampsiteDescription, CampsiteName},
        Json, Response,
    },
    campsite::Campsite,
    db::{self, TxResult},
    id::CampsiteId,
    AppState,
};

pub mod campsite;

/// Lists all campsites, ordered by name.
///
/// # Errors
///
/// See [`crate::api::Error`].
#[debug_handler(state = AppState)]
pub async fn get(State(state): State<AppState>) -> Response<Vec<Campsite>> {
    let campsites = db::transaction!(state.db_pool, async |tx| -> TxResult<_, api::Error> {
        Ok(Campsite::list(tx.as_mut()).await?)
    })
    .await?;

    Ok((StatusCode::OK, Json(campsites)))
}

/// A `POST` request body for this API route.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PostRequest {
    /// The campsite's name.
    pub name: CampsiteName,

    /// A description of the campsite.
    #[serde(default = "empty_description")]
    pub description: CampsiteDescription,
}

/// The description of a campsite created without one.
fn empty_description() -> CampsiteDescription {
    CampsiteDescription::try_from(String::new()).expect("empty description should be valid")
}

/// Creates a new campsite.
///
/// # Errors
///
/// See [`crate::api::Error`].
#[debug_handler(state = AppState)]
pub async fn post(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(body): Json<PostRequest>,
) -> Response<Campsite> {
    let mut campsite_id = CampsiteId::generate();
    let now = Utc::now();

    let campsite: Campsite = loop {
        match sqlx::query_as(
            "INSERT INTO campsites (id, name, description, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $4)
                RETURNING id, name, description, created_at, updated_at",
        )
        .bind(campsite_id)
        .bind(body.name.as_str())
        .bind(body.description.as_str())
        .bind(now)
        .fetch_one(&state.db_pool)
        .await
        {
            Err(sqlx::Error::Database(error)) => match error.constraint() {
                Some("campsites_pkey") => campsite_id.reroll(),
                Some("campsites_name_key") => return Err(api::Error::CampsiteNameTaken),
                _ => return Err(sqlx::Error::Database(error).into()),
            },
            result => break result?,
        }
    };

    Ok((StatusCode::CREATED, Json(campsite)))
}
