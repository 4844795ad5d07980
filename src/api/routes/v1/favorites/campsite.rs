//! A single campsite among the signed-in user's favorites.

use axum::{extract::State, http::StatusCode, response::Response as AxumResponse};
use axum_macros::debug_handler;

use crate::{
    api::{self, auth::AuthUser, Path, Reply},
    campsite::Campsite,
    db::{self, TxError, TxResult},
    favorite::Favorite,
    id::CampsiteId,
    AppState,
};

/// Answers a plain `OPTIONS` request.
#[expect(clippy::unused_async, reason = "Axum route handlers must be async")]
#[debug_handler]
pub async fn options() -> StatusCode {
    StatusCode::OK
}

/// Rejects `GET` requests. A favorite campsite is only visible as part of the whole favorites.
#[expect(clippy::unused_async, reason = "Axum route handlers must be async")]
#[debug_handler]
pub async fn get(Path(campsite_id): Path<String>) -> AxumResponse {
    api::unsupported("GET", &format!("/favorites/{campsite_id}"))
}

/// Adds a campsite to the signed-in user's favorites, creating the user's favorites if they have
/// none. Responds with the saved favorites, or a notice if the campsite was already there.
///
/// # Errors
///
/// See [`crate::api::Error`].
#[debug_handler(state = AppState)]
pub async fn post(
    State(state): State<AppState>,
    user: AuthUser,
    Path(campsite_id): Path<CampsiteId>,
) -> Result<Reply<Favorite>, api::Error> {
    db::transaction!(state.db_pool, async |tx| -> TxResult<_, api::Error> {
        if Campsite::find(tx.as_mut(), campsite_id).await?.is_none() {
            return Err(TxError::Abort(api::Error::CampsiteNotFound));
        }

        let mut favorite = Favorite::find(tx.as_mut(), user.id)
            .await?
            .unwrap_or_else(|| Favorite::new(user.id));

        if !favorite.add(campsite_id) {
            return Ok(Reply::Notice(
                "That campsite is already in the list of favorites!",
            ));
        }

        Ok(Reply::Json(favorite.save(tx.as_mut()).await?))
    })
    .await
}

/// Rejects `PUT` requests, since there's nothing to update about a favorite campsite.
#[expect(clippy::unused_async, reason = "Axum route handlers must be async")]
#[debug_handler(state = AppState)]
pub async fn put(_user: AuthUser, Path(campsite_id): Path<String>) -> AxumResponse {
    api::unsupported("PUT", &format!("/favorites/{campsite_id}"))
}

/// Removes a campsite from the signed-in user's favorites. Responds with the saved favorites, or
/// a notice if there was nothing to remove.
///
/// # Errors
///
/// See [`crate::api::Error`].
#[debug_handler(state = AppState)]
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(campsite_id): Path<CampsiteId>,
) -> Result<Reply<Favorite>, api::Error> {
    db::transaction!(state.db_pool, async |tx| -> TxResult<_, api::Error> {
        let Some(mut favorite) = Favorite::find(tx.as_mut(), user.id).await? else {
            return Ok(Reply::Notice("No favorites to delete!"));
        };

        if !favorite.remove(&campsite_id) {
            return Ok(Reply::Notice("That campsite is not among your favorites."));
        }

        Ok(Reply::Json(favorite.save(tx.as_mut()).await?))
    })
    .await
}
