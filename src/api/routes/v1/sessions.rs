//! The set of users' sign-in sessions.

use axum::{extract::State, http::StatusCode};
use axum_macros::debug_handler;
use serde::{Deserialize, Serialize};
use sqlx::Acquire;
use tower_cookies::{
    cookie::{time::Duration, SameSite},
    Cookie, Cookies,
};

use crate::{
    api::{
        self,
        auth::{session_token, SESSION_COOKIE, SESSION_MAX_AGE_DAYS},
        validation::{UserEmail, UserPassword},
        Json, Response,
    },
    config::Config,
    crypto::{hash_without_salt, verify_hash},
    db::{self, TxError, TxResult},
    id::{Token, UserId},
    AppState,
};

/// A `POST` request body for this API route.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PostRequest {
    /// The email address of the user signing in.
    pub email: UserEmail,

    /// The user's password in plain text.
    pub password: UserPassword,
}

/// Signs a user in, creating a sign-in session and setting a session cookie.
///
/// # Errors
///
/// See [`crate::api::Error`].
#[debug_handler(state = AppState)]
pub async fn post(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(body): Json<PostRequest>,
) -> Response<PostResponse> {
    let token = db::transaction!(state.db_pool, async |tx| -> TxResult<_, api::Error> {
        let Some((user_id, _)) = sqlx::query_as::<_, (UserId, String)>(
            "SELECT id, password_hash FROM users
                WHERE email = $1",
        )
        .bind(body.email.as_str())
        .fetch_optional(tx.as_mut())
        .await?
        .filter(|(_, password_hash)| verify_hash(&*body.password, password_hash)) else {
            // To prevent user enumeration, send this same error response whether or not the email
            // is correct.
            return Err(TxError::Abort(api::Error::UserCredentialsWrong));
        };

        let mut token = Token::generate();

        loop {
            // If this loop's query fails from a token conflict, this savepoint is rolled back to
            // rather than aborting the entire transaction.
            let mut savepoint = tx.begin().await?;

            let token_hash = hash_without_salt(&token);

            match sqlx::query(
                "INSERT INTO sessions (token_hash, user_id)
                    VALUES ($1, $2)",
            )
            .bind(token_hash.as_ref())
            .bind(user_id)
            .execute(savepoint.as_mut())
            .await
            {
                Err(sqlx::Error::Database(error))
                    if error.constraint() == Some("sessions_pkey") =>
                {
                    token.reroll();
                    continue;
                }
                result => result?,
            };

            savepoint.commit().await?;
            break;
        }

        Ok(token)
    })
    .await?;

    tracing::info!("user signed in");

    cookies.add(session_cookie(&state.config, token.to_string()));

    Ok((StatusCode::OK, Json(PostResponse {})))
}

/// A `POST` response body for this API route.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    // To reduce the session token's attack surface, it isn't included in the response. It's set as
    // an `HttpOnly` cookie instead so browser scripts can't access it.
}

/// Signs the current user out, ending their session and removing the session cookie.
///
/// # Errors
///
/// See [`crate::api::Error`].
#[debug_handler(state = AppState)]
pub async fn delete(
    State(state): State<AppState>,
    cookies: Cookies,
) -> Response<DeleteResponse> {
    let token = session_token(&cookies)?;
    let token_hash = hash_without_salt(&token);

    let deleted = db::transaction!(state.db_pool, async |tx| -> TxResult<_, api::Error> {
        Ok(sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
            .bind(token_hash.as_ref())
            .execute(tx.as_mut())
            .await?
            .rows_affected())
    })
    .await?;

    if deleted == 0 {
        return Err(api::Error::AuthFailed);
    }

    cookies.remove(session_cookie(&state.config, String::new()));

    Ok((StatusCode::OK, Json(DeleteResponse {})))
}

/// A `DELETE` response body for this API route.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {}

/// Builds the session cookie. Removing a cookie needs the same domain and path it was set with.
fn session_cookie(config: &Config, value: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .domain(config.website_domain().to_owned())
        .http_only(true)
        .max_age(Duration::days(SESSION_MAX_AGE_DAYS))
        .path("/")
        .same_site(SameSite::Lax)
        .secure(config.secure_cookies())
        .into()
}
