//! A single campsite.

use axum::{extract::State, http::StatusCode};
use axum_macros::debug_handler;

use crate::{
    api::{self, Json, Path, Response},
    campsite::Campsite,
    db::{self, TxResult},
    id::CampsiteId,
    AppState,
};

/// Gets a campsite by its ID.
///
/// # Errors
///
/// See [`crate::api::Error`].
#[debug_handler(state = AppState)]
pub async fn get(
    State(state): State<AppState>,
    Path(campsite_id): Path<CampsiteId>,
) -> Response<Campsite> {
    let Some(campsite) = db::transaction!(state.db_pool, async |tx| -> TxResult<_, api::Error> {
        Ok(Campsite::find(tx.as_mut(), campsite_id).await?)
    })
    .await?
    else {
        return Err(api::Error::ResourceNotFound);
    };

    Ok((StatusCode::OK, Json(campsite)))
}
