//! The set of all user accounts.

use axum::{extract::State, http::StatusCode};
use axum_macros::debug_handler;
use serde::{Deserialize, Serialize};

use crate::{
    api::{
        self,
        validation::{NewUserPassword, UserEmail, UserName},
        Json, Response,
    },
    crypto::hash_with_salt,
    id::UserId,
    AppState,
};

/// A `POST` request body for this API route.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PostRequest {
    /// The user's email address.
    pub email: UserEmail,

    /// The user's name.
    pub name: UserName,

    /// The user's password in plain text.
    pub password: NewUserPassword,
}

/// Creates a new user account.
///
/// # Errors
///
/// See [`crate::api::Error`].
#[debug_handler(state = AppState)]
pub async fn post(
    State(state): State<AppState>,
    Json(body): Json<PostRequest>,
) -> Response<PostResponse> {
    let mut user_id = UserId::generate();

    let password_hash = hash_with_salt(&*body.password);

    loop {
        match sqlx::query(
            "INSERT INTO users (id, email, name, password_hash)
                VALUES ($1, $2, $3, $4)",
        )
        .bind(user_id)
        .bind(body.email.as_str())
        .bind(body.name.as_str())
        .bind(&password_hash)
        .execute(&state.db_pool)
        .await
        {
            Err(sqlx::Error::Database(error)) => match error.constraint() {
                Some("users_pkey") => user_id.reroll(),
                Some("users_email_key") => return Err(api::Error::EmailTaken),
                _ => return Err(sqlx::Error::Database(error).into()),
            },
            result => {
                result?;
                break;
            }
        }
    }

    tracing::info!(user.id = %user_id, "user signed up");

    Ok((
        StatusCode::CREATED,
        Json(PostResponse {
            id: user_id,
            email: body.email,
            name: body.name,
        }),
    ))
}

/// A `POST` response body for this API route.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    /// The new user's ID.
    pub id: UserId,

    /// The user's email address.
    pub email: UserEmail,

    /// The user's name.
    pub name: UserName,
}
