//! The signed-in user's favorite campsites.

use axum::{extract::State, http::StatusCode, response::Response as AxumResponse};
use axum_macros::debug_handler;
use serde::Deserialize;

use crate::{
    api::{self, auth::AuthUser, Json, Reply, Response},
    campsite::Campsite,
    db::{self, TxError, TxResult},
    favorite::{Favorite, PopulatedFavorite},
    id::CampsiteId,
    AppState,
};

pub mod campsite;

/// Answers a plain `OPTIONS` request. CORS preflight requests are answered by the CORS layer
/// before reaching this.
#[expect(clippy::unused_async, reason = "Axum route handlers must be async")]
#[debug_handler]
pub async fn options() -> StatusCode {
    StatusCode::OK
}

/// Gets the signed-in user's favorites, with the user and campsites expanded. The body is `null`
/// if the user has no favorites.
///
/// # Errors
///
/// See [`crate::api::Error`].
#[debug_handler(state = AppState)]
pub async fn get(
    State(state): State<AppState>,
    user: AuthUser,
) -> Response<Option<PopulatedFavorite>> {
    let favorite = db::transaction!(state.db_pool, async |tx| -> TxResult<_, api::Error> {
        let Some(favorite) = Favorite::find(tx.as_mut(), user.id).await? else {
            return Ok(None);
        };

        Ok(Some(favorite.populate(tx.as_mut()).await?))
    })
    .await?;

    Ok((StatusCode::OK, Json(favorite)))
}

/// A reference to a campsite in a request body.
#[derive(Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CampsiteRef {
    /// The campsite's ID.
    #[serde(alias = "_id")]
    pub id: CampsiteId,
}

/// A `POST` request body for this API route.
#[derive(Deserialize, Clone, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PostRequest {
    /// The campsites to add to the favorites.
    pub campsites: Vec<CampsiteRef>,
}

/// Adds each of the specified campsites not already among the signed-in user's favorites,
/// creating the user's favorites if they have none. Responds with the saved favorites.
///
/// # Errors
///
/// See [`crate::api::Error`].
#[debug_handler(state = AppState)]
pub async fn post(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<PostRequest>,
) -> Response<Favorite> {
    let campsite_ids: Vec<CampsiteId> = body.campsites.iter().map(|campsite| campsite.id).collect();

    let favorite = db::transaction!(state.db_pool, async |tx| -> TxResult<_, api::Error> {
        if !Campsite::missing(tx.as_mut(), &campsite_ids).await?.is_empty() {
            return Err(TxError::Abort(api::Error::CampsiteNotFound));
        }

        let mut favorite = Favorite::find(tx.as_mut(), user.id)
            .await?
            .unwrap_or_else(|| Favorite::new(user.id));

        favorite.add_all(campsite_ids.iter().copied());

        Ok(favorite.save(tx.as_mut()).await?)
    })
    .await?;

    Ok((StatusCode::OK, Json(favorite)))
}

/// Rejects `PUT` requests, since the favorites can only be added to or removed from.
#[expect(clippy::unused_async, reason = "Axum route handlers must be async")]
#[debug_handler(state = AppState)]
pub async fn put(_user: AuthUser) -> AxumResponse {
    api::unsupported("PUT", "/favorites")
}

/// Deletes all of the signed-in user's favorites, responding with what was deleted.
///
/// # Errors
///
/// See [`crate::api::Error`].
#[debug_handler(state = AppState)]
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Reply<Favorite>, api::Error> {
    let deleted = db::transaction!(state.db_pool, async |tx| -> TxResult<_, api::Error> {
        Ok(Favorite::delete(tx.as_mut(), user.id).await?)
    })
    .await?;

    Ok(match deleted {
        Some(favorite) => Reply::Json(favorite),
        None => Reply::Notice("You do not have any favorites to delete."),
    })
}
