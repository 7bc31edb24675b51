//! SurrealDB implementation of [`OrganizerRepository`].
//!
//! The lookup joins on the location *name* (`assigned_hall`), not an id.
//! That is the documented behavior of the upstream directory; isolating
//! it here keeps the fragility in one place.

use chrono::{DateTime, Utc};
use crowdbalance_core::error::CoreResult;
use crowdbalance_core::models::organizer::{CreateOrganizer, Organizer};
use crowdbalance_core::repository::OrganizerRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct OrganizerRow {
    name: String,
    email: String,
    assigned_hall: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct OrganizerRowWithId {
    record_id: String,
    name: String,
    email: String,
    assigned_hall: String,
    created_at: DateTime<Utc>,
}

impl OrganizerRow {
    fn into_organizer(self, id: Uuid) -> Organizer {
        Organizer {
            id,
            name: self.name,
            email: self.email,
            assigned_hall: self.assigned_hall,
            created_at: self.created_at,
        }
    }
}

impl OrganizerRowWithId {
    fn try_into_organizer(self) -> Result<Organizer, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        Ok(Organizer {
            id,
            name: self.name,
            email: self.email,
            assigned_hall: self.assigned_hall,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the Organizer repository.
pub struct SurrealOrganizerRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> Clone for SurrealOrganizerRepository<C> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}

impl<C: Connection> SurrealOrganizerRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> OrganizerRepository for SurrealOrganizerRepository<C> {
    async fn create(&self, input: CreateOrganizer) -> CoreResult<Organizer> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "CREATE type::record('organizer', $id) SET \
                 name = $name, \
                 email = $email, \
                 assigned_hall = $assigned_hall",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("email", input.email))
            .bind(("assigned_hall", input.assigned_hall))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OrganizerRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or(DbError::NotFound {
            entity: "organizer".into(),
            id: id_str,
        })?;

        Ok(row.into_organizer(id))
    }

    async fn find_by_assigned_hall(&self, hall: &str) -> CoreResult<Vec<Organizer>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM organizer \
                 WHERE assigned_hall = $hall \
                 ORDER BY created_at ASC",
            )
            .bind(("hall", hall.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OrganizerRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_organizer())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(items)
    }
}
