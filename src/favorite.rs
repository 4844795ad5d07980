//! A user's list of favorite campsites.
//!
//! Each user has at most one [`Favorite`] document, which is loaded, changed in memory, and saved
//! back as a whole. Having an empty document is distinct from having none at all.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgConnection;

use crate::{
    campsite::Campsite,
    id::{CampsiteId, UserId},
    user::UserSummary,
};

/// A user's favorites document.
#[derive(sqlx::FromRow, Serialize, Clone, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    /// The user the favorites belong to.
    #[sqlx(rename = "user_id")]
    pub user: UserId,

    /// The IDs of the user's favorite campsites, in the order they were added. Never contains
    /// duplicates.
    #[sqlx(rename = "campsite_ids")]
    pub campsites: Vec<CampsiteId>,

    /// When the document was created.
    pub created_at: DateTime<Utc>,

    /// When the document was last saved.
    pub updated_at: DateTime<Utc>,
}

/// The columns selected for a [`Favorite`].
const COLUMNS: &str = "user_id, campsite_ids, created_at, updated_at";

impl Favorite {
    /// Creates an unsaved, empty favorites document for a user.
    pub fn new(user: UserId) -> Self {
        let now = Utc::now();

        Self {
            user,
            campsites: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Checks whether a campsite is among the favorites.
    pub fn contains(&self, campsite: &CampsiteId) -> bool {
        self.campsites.contains(campsite)
    }

    /// Appends a campsite to the favorites, returning `false` without changing anything if it's
    /// already there.
    pub fn add(&mut self, campsite: CampsiteId) -> bool {
        if self.contains(&campsite) {
            return false;
        }

        self.campsites.push(campsite);
        true
    }

    /// Appends each campsite not already among the favorites, returning how many were added.
    pub fn add_all<I: IntoIterator<Item = CampsiteId>>(&mut self, campsites: I) -> usize {
        campsites
            .into_iter()
            .filter(|&campsite| self.add(campsite))
            .count()
    }

    /// Removes a campsite from the favorites, returning `false` if it wasn't there.
    pub fn remove(&mut self, campsite: &CampsiteId) -> bool {
        let Some(index) = self.campsites.iter().position(|id| id == campsite) else {
            return false;
        };

        self.campsites.remove(index);
        true
    }

    /// Finds a user's favorites document.
    ///
    /// # Errors
    ///
    /// Fails if the query fails.
    pub async fn find(conn: &mut PgConnection, user: UserId) -> sqlx::Result<Option<Self>> {
        sqlx::query_as(&format!("SELECT {COLUMNS} FROM favorites WHERE user_id = $1"))
            .bind(user)
            .fetch_optional(conn)
            .await
    }

    /// Inserts or overwrites the document, returning it as stored.
    ///
    /// # Errors
    ///
    /// Fails if the query fails.
    pub async fn save(mut self, conn: &mut PgConnection) -> sqlx::Result<Self> {
        self.updated_at = Utc::now();

        sqlx::query_as(&format!(
            "INSERT INTO favorites (user_id, campsite_ids, created_at, updated_at)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (user_id) DO UPDATE
                    SET campsite_ids = EXCLUDED.campsite_ids, updated_at = EXCLUDED.updated_at
                RETURNING {COLUMNS}"
        ))
        .bind(self.user)
        .bind(&self.campsites)
        .bind(self.created_at)
        .bind(self.updated_at)
        .fetch_one(conn)
        .await
    }

    /// Deletes a user's favorites document, returning it if it existed.
    ///
    /// # Errors
    ///
    /// Fails if the query fails.
    pub async fn delete(conn: &mut PgConnection, user: UserId) -> sqlx::Result<Option<Self>> {
        sqlx::query_as(&format!(
            "DELETE FROM favorites WHERE user_id = $1 RETURNING {COLUMNS}"
        ))
        .bind(user)
        .fetch_optional(conn)
        .await
    }

    /// Replaces the document's IDs with the user and campsites they refer to.
    ///
    /// # Errors
    ///
    /// Fails if a query fails or the user no longer exists.
    pub async fn populate(self, conn: &mut PgConnection) -> sqlx::Result<PopulatedFavorite> {
        let user = UserSummary::find(&mut *conn, self.user)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        let campsites = Campsite::find_many(&mut *conn, &self.campsites).await?;

        Ok(PopulatedFavorite {
            user,
            campsites: in_order(&self.campsites, campsites),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Sorts campsites into the order of `ids`, dropping any campsite whose ID isn't listed.
fn in_order(ids: &[CampsiteId], campsites: Vec<Campsite>) -> Vec<Campsite> {
    let mut campsites_by_id: HashMap<CampsiteId, Campsite> = campsites
        .into_iter()
        .map(|campsite| (campsite.id, campsite))
        .collect();

    ids.iter()
        .filter_map(|id| campsites_by_id.remove(id))
        .collect()
}

/// A [`Favorite`] with the user and campsites it refers to in place of their IDs.
#[derive(Serialize, Clone, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PopulatedFavorite {
    /// The user the favorites belong to.
    pub user: UserSummary,

    /// The user's favorite campsites, in the order they were added.
    pub campsites: Vec<Campsite>,

    /// When the document was created.
    pub created_at: DateTime<Utc>,

    /// When the document was last saved.
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn campsite_id(n: u8) -> CampsiteId {
        CampsiteId::from([n; 8])
    }

    fn campsite(n: u8) -> Campsite {
        let now = Utc::now();

        Campsite {
            id: campsite_id(n),
            name: format!("Campsite {n}"),
            description: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn new_favorite_is_empty() {
        let favorite = Favorite::new(UserId::from([7; 8]));

        assert_eq!(favorite.user, UserId::from([7; 8]));
        assert!(favorite.campsites.is_empty(), "new document should be empty");
        assert_eq!(favorite.created_at, favorite.updated_at);
    }

    #[test]
    fn add_skips_campsites_already_present() {
        let mut favorite = Favorite::new(UserId::from([0; 8]));

        assert!(favorite.add(campsite_id(1)), "first add should succeed");
        assert!(!favorite.add(campsite_id(1)), "second add should be a no-op");
        assert_eq!(favorite.campsites, [campsite_id(1)]);
    }

    #[test]
    fn add_all_keeps_order_and_drops_duplicates() {
        let mut favorite = Favorite::new(UserId::from([0; 8]));
        favorite.add(campsite_id(2));

        let added = favorite.add_all([
            campsite_id(1),
            campsite_id(2),
            campsite_id(3),
            campsite_id(1),
        ]);

        assert_eq!(added, 2);
        assert_eq!(
            favorite.campsites,
            [campsite_id(2), campsite_id(1), campsite_id(3)],
        );
    }

    #[test]
    fn remove_splices_out_campsite() {
        let mut favorite = Favorite::new(UserId::from([0; 8]));
        favorite.add_all([campsite_id(1), campsite_id(2), campsite_id(3)]);

        assert!(favorite.remove(&campsite_id(2)), "present campsite should be removed");
        assert_eq!(favorite.campsites, [campsite_id(1), campsite_id(3)]);

        assert!(!favorite.remove(&campsite_id(2)), "absent campsite can't be removed");
        assert_eq!(favorite.campsites, [campsite_id(1), campsite_id(3)]);
    }

    #[test]
    fn emptied_favorite_still_exists() {
        let mut favorite = Favorite::new(UserId::from([0; 8]));
        favorite.add(campsite_id(1));
        favorite.remove(&campsite_id(1));

        assert!(favorite.campsites.is_empty(), "document should be empty");
        assert!(!favorite.contains(&campsite_id(1)), "campsite should be gone");
    }

    #[test]
    fn populated_campsites_follow_document_order() {
        let ids = [campsite_id(3), campsite_id(1), campsite_id(9), campsite_id(2)];
        let found = vec![campsite(1), campsite(2), campsite(3)];

        let ordered: Vec<CampsiteId> = in_order(&ids, found)
            .into_iter()
            .map(|campsite| campsite.id)
            .collect();

        assert_eq!(ordered, [campsite_id(3), campsite_id(1), campsite_id(2)]);
    }

    #[test]
    fn favorite_serializes_ids_as_base64url() -> anyhow::Result<()> {
        let mut favorite = Favorite::new(UserId::from([0; 8]));
        favorite.add(campsite_id(0xff));

        let json = serde_json::to_value(&favorite)?;

        assert_eq!(json["user"], "AAAAAAAAAAA");
        assert_eq!(json["campsites"], serde_json::json!(["__________8"]));
        assert!(json.get("createdAt").is_some(), "timestamps should be camelCase");

        Ok(())
    }
}
