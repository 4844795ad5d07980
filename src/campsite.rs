//! See [`Campsite`].

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgConnection;

use crate::id::CampsiteId;

/// A campsite users can add to their favorites.
#[derive(sqlx::FromRow, Serialize, Clone, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Campsite {
    /// The campsite's ID.
    pub id: CampsiteId,

    /// The campsite's unique name.
    pub name: String,

    /// A description of the campsite.
    pub description: String,

    /// When the campsite was created.
    pub created_at: DateTime<Utc>,

    /// When the campsite was last changed.
    pub updated_at: DateTime<Utc>,
}

impl Campsite {
    /// Finds a campsite by its ID.
    ///
    /// # Errors
    ///
    /// Fails if the query fails.
    pub async fn find(conn: &mut PgConnection, id: CampsiteId) -> sqlx::Result<Option<Self>> {
        sqlx::query_as(
            "SELECT id, name, description, created_at, updated_at FROM campsites
                WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(conn)
        .await
    }

    /// Finds every campsite with one of the specified IDs, in no particular order. IDs of
    /// nonexistent campsites are skipped.
    ///
    /// # Errors
    ///
    /// Fails if the query fails.
    pub async fn find_many(conn: &mut PgConnection, ids: &[CampsiteId]) -> sqlx::Result<Vec<Self>> {
        sqlx::query_as(
            "SELECT id, name, description, created_at, updated_at FROM campsites
                WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(conn)
        .await
    }

    /// Lists all campsites, ordered by name.
    ///
    /// # Errors
    ///
    /// Fails if the query fails.
    pub async fn list(conn: &mut PgConnection) -> sqlx::Result<Vec<Self>> {
        sqlx::query_as(
            "SELECT id, name, description, created_at, updated_at FROM campsites
                ORDER BY name",
        )
        .fetch_all(conn)
        .await
    }

    /// Finds which of the specified campsite IDs don't belong to any campsite.
    ///
    /// # Errors
    ///
    /// Fails if the query fails.
    pub async fn missing(
        conn: &mut PgConnection,
        ids: &[CampsiteId],
    ) -> sqlx::Result<Vec<CampsiteId>> {
        sqlx::query_scalar(
            "SELECT requested.id FROM UNNEST($1::BYTEA[]) AS requested (id)
                WHERE NOT EXISTS (SELECT 1 FROM campsites WHERE campsites.id = requested.id)",
        )
        .bind(ids)
        .fetch_all(conn)
        .await
    }
}
