//! See [`UserSummary`].

use serde::Serialize;
use sqlx::PgConnection;

use crate::id::UserId;

/// The public part of a user's account, shown wherever another resource refers to the user.
#[derive(sqlx::FromRow, Serialize, Clone, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    /// The user's ID.
    pub id: UserId,

    /// The user's name.
    pub name: String,
}

impl UserSummary {
    /// Finds a user by their ID.
    ///
    /// # Errors
    ///
    /// Fails if the query fails.
    pub async fn find(conn: &mut PgConnection, id: UserId) -> sqlx::Result<Option<Self>> {
        sqlx::query_as("SELECT id, name FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(conn)
            .await
    }
}
