//! Authentication of API requests by their session cookie.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use chrono::{TimeDelta, Utc};
use sqlx::PgPool;
use tower_cookies::Cookies;

use crate::{
    api,
    crypto::hash_without_salt,
    id::{Token, UserId},
};

/// The name of the cookie holding a session token.
pub const SESSION_COOKIE: &str = "token";

/// How many days a session lasts after its creation.
pub const SESSION_MAX_AGE_DAYS: i64 = 60;

/// The user signed in by a request's session cookie.
///
/// Extracting this rejects the request with [`api::Error::AuthFailed`] unless the cookie holds the
/// token of an unexpired session.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct AuthUser {
    /// The signed-in user's ID.
    pub id: UserId,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    PgPool: FromRef<S>,
{
    type Rejection = api::Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let cookies = Cookies::from_request_parts(parts, state)
            .await
            .map_err(|_| api::Error::AuthFailed)?;
        let token = session_token(&cookies)?;
        let db_pool = PgPool::from_ref(state);

        let token_hash = hash_without_salt(&token);
        let oldest_allowed = Utc::now() - TimeDelta::days(SESSION_MAX_AGE_DAYS);

        let Some(id) = sqlx::query_scalar::<_, UserId>(
            "SELECT user_id FROM sessions
                WHERE token_hash = $1 AND created_at > $2",
        )
        .bind(token_hash.as_ref())
        .bind(oldest_allowed)
        .fetch_optional(&db_pool)
        .await?
        else {
            return Err(api::Error::AuthFailed);
        };

        Ok(Self { id })
    }
}

/// Reads the session token from a request's cookies without checking it against the database.
///
/// # Errors
///
/// Fails if the cookie is missing or isn't a well-formed token.
pub(crate) fn session_token(cookies: &Cookies) -> Result<Token, api::Error> {
    cookies
        .get(SESSION_COOKIE)
        .and_then(|cookie| cookie.value().parse().ok())
        .ok_or(api::Error::AuthFailed)
}
