//! The HTTP API, served under `/api/`.

pub mod auth;
pub mod cors;
pub mod routes;
pub mod validation;

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::{header::CONTENT_TYPE, HeaderValue, StatusCode},
    response::{IntoResponse, Response as AxumResponse},
};
use axum_macros::{FromRequest, FromRequestParts};
use serde::Serialize;
use strum_macros::IntoStaticStr;
use thiserror::Error;

pub use routes::router;

/// An API error.
#[derive(Error, IntoStaticStr, Debug)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum Error {
    /// The request body couldn't be read or deserialized.
    #[error("{0}")]
    InvalidBody(#[from] JsonRejection),

    /// A path parameter couldn't be deserialized.
    #[error("{0}")]
    InvalidPath(#[from] PathRejection),

    /// The requested API route doesn't exist.
    #[error("API route not found")]
    RouteNotFound,

    /// The requested API route exists, but not with the request's HTTP method.
    #[error("HTTP method not allowed for this API route")]
    MethodNotAllowed,

    /// The requested resource doesn't exist.
    #[error("resource not found")]
    ResourceNotFound,

    /// A campsite referenced by the request doesn't exist.
    #[error("campsite not found")]
    CampsiteNotFound,

    /// The request needs a valid session and doesn't have one.
    #[error("you must be signed in")]
    AuthFailed,

    /// The email or password specified by the request is incorrect.
    #[error("incorrect email or password")]
    UserCredentialsWrong,

    /// The requested email is already used by another user.
    #[error("email already taken")]
    EmailTaken,

    /// The requested campsite name is already used by another campsite.
    #[error("campsite name already taken")]
    CampsiteNameTaken,

    /// An unexpected database error occurred.
    #[error("internal server error")]
    Internal(#[from] sqlx::Error),
}

impl Error {
    /// Gets the HTTP response status code corresponding to the API error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidBody(rejection) => rejection.status(),
            Self::InvalidPath(_) => StatusCode::BAD_REQUEST,
            Self::RouteNotFound | Self::ResourceNotFound | Self::CampsiteNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::AuthFailed | Self::UserCredentialsWrong => StatusCode::UNAUTHORIZED,
            Self::EmailTaken | Self::CampsiteNameTaken => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Gets the error's machine-readable code, e.g. `CAMPSITE_NOT_FOUND`.
    pub fn code(&self) -> &'static str {
        self.into()
    }
}

/// The body of an error response.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// The error's machine-readable code.
    pub code: &'static str,

    /// A human-readable description of the error.
    pub message: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> AxumResponse {
        if let Self::Internal(error) = &self {
            tracing::error!(%error, "database error while handling request");
        }

        let body = ErrorBody {
            code: self.code(),
            message: self.to_string(),
        };

        (self.status(), axum::Json(body)).into_response()
    }
}

/// A JSON extractor and response with [`Error`] as its rejection.
#[derive(FromRequest, Clone, Copy, Default, Debug)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> AxumResponse {
        axum::Json(self.0).into_response()
    }
}

/// A path parameter extractor with [`Error`] as its rejection.
#[derive(FromRequestParts, Clone, Copy, Default, Debug)]
#[from_request(via(axum::extract::Path), rejection(Error))]
pub struct Path<T>(pub T);

/// The result of an API handler that always responds with JSON.
pub type Response<T> = Result<(StatusCode, Json<T>), Error>;

/// The successful outcome of an API handler that may have nothing to do.
///
/// A [`Reply::Notice`] is still a success (`200 OK`), but its body is a plain text message instead
/// of JSON.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Reply<T> {
    /// The handler changed or found the resource, which is sent as JSON.
    Json(T),

    /// The handler had nothing to do, for the reason in the message.
    Notice(&'static str),
}

impl<T: Serialize> IntoResponse for Reply<T> {
    fn into_response(self) -> AxumResponse {
        match self {
            Self::Json(value) => (StatusCode::OK, Json(value)).into_response(),
            Self::Notice(message) => plain_text(StatusCode::OK, message.into()),
        }
    }
}

/// Builds a `text/plain` response.
pub fn plain_text(status: StatusCode, message: String) -> AxumResponse {
    (
        status,
        [(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"))],
        message,
    )
        .into_response()
}

/// Builds the `403 Forbidden` response for an HTTP method a resource doesn't support.
pub fn unsupported(method: &str, path: &str) -> AxumResponse {
    plain_text(
        StatusCode::FORBIDDEN,
        format!("{method} operation not supported on {path}"),
    )
}
