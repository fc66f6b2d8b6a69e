//! Venue Repository

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Venue, VenueCreate, VenueUpdate};
use shared::util::now_millis;

const TABLE: &str = "venue";

#[derive(Clone)]
pub struct VenueRepository {
    base: BaseRepository,
}

impl VenueRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, payload: VenueCreate) -> RepoResult<Venue> {
        let name = payload.name.trim().to_string();
        if name.is_empty() {
            return Err(RepoError::Validation("Venue name is required".to_string()));
        }
        if self.find_by_name(&name).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Venue '{name}' already exists"
            )));
        }

        let venue = Venue {
            id: None,
            name,
            address: payload.address,
            is_active: true,
            created_at: Some(now_millis()),
        };

        let created: Option<Venue> = self.base.db().create(TABLE).content(venue).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create venue".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Venue>> {
        let record_id = self.base.parse_id(id)?;
        let venue: Option<Venue> = self.base.db().select(record_id).await?;
        Ok(venue)
    }

    pub async fn find_by_name(&self, name: &str) -> RepoResult<Option<Venue>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM venue WHERE name = $name LIMIT 1")
            .bind(("name", name.to_string()))
            .await?;

        let venues: Vec<Venue> = result.take(0)?;
        Ok(venues.into_iter().next())
    }

    /// Active venues, alphabetical. Admins can ask for inactive ones too.
    pub async fn find_all(&self, include_inactive: bool) -> RepoResult<Vec<Venue>> {
        let sql = if include_inactive {
            "SELECT * FROM venue ORDER BY name ASC"
        } else {
            "SELECT * FROM venue WHERE is_active = true ORDER BY name ASC"
        };

        let mut result = self.base.db().query(sql).await?;
        let venues: Vec<Venue> = result.take(0)?;
        Ok(venues)
    }

    pub async fn update(&self, id: &str, payload: VenueUpdate) -> RepoResult<Venue> {
        let record_id = self.base.parse_id(id)?;

        if let Some(name) = &payload.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(RepoError::Validation("Venue name is required".to_string()));
            }
            if let Some(existing) = self.find_by_name(name).await?
                && existing.id.as_ref() != Some(&record_id)
            {
                return Err(RepoError::Duplicate(format!(
                    "Venue '{name}' already exists"
                )));
            }
        }

        let mut result = self
            .base
            .db()
            .query("UPDATE $thing MERGE $data")
            .bind(("thing", record_id))
            .bind(("data", payload))
            .await?;

        let updated: Vec<Venue> = result.take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound("Venue not found".to_string()))
    }

    /// Soft delete: reports keep referencing the venue, it just stops
    /// showing up for new entries.
    pub async fn deactivate(&self, id: &str) -> RepoResult<Venue> {
        self.update(
            id,
            VenueUpdate {
                name: None,
                address: None,
                is_active: Some(false),
            },
        )
        .await
    }
}
