//! SurrealDB implementation of [`LocationRepository`].
//!
//! Write discipline on the activity log: the append path is a purely
//! additive `+=` on the log field, and the subtractive paths (prune,
//! clear) are single conditional UPDATE statements whose array filter
//! runs inside the store. Neither side ever does a read-filter-replace
//! round trip, so an append landing between a sweeper's read and write
//! cannot be lost.

use chrono::{DateTime, Utc};
use crowdbalance_core::error::{CoreError, CoreResult};
use crowdbalance_core::models::activity::{ActivityEntry, CrowdLevel};
use crowdbalance_core::models::location::{
    ClearedLog, CreateLocation, Location, UpdateLocation,
};
use crowdbalance_core::repository::LocationRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ActivityRow {
    crowd_level: String,
    timestamp: DateTime<Utc>,
    organizer_id: String,
}

impl ActivityRow {
    fn into_entry(self) -> ActivityEntry {
        ActivityEntry {
            crowd_level: self.crowd_level,
            timestamp: self.timestamp,
            organizer_id: self.organizer_id,
        }
    }

    fn from_entry(entry: ActivityEntry) -> Self {
        Self {
            crowd_level: entry.crowd_level,
            timestamp: entry.timestamp,
            organizer_id: entry.organizer_id,
        }
    }
}

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct LocationRow {
    name: String,
    capacity: i64,
    is_active: bool,
    activity_log: Vec<ActivityRow>,
    last_updated: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct LocationRowWithId {
    record_id: String,
    name: String,
    capacity: i64,
    is_active: bool,
    activity_log: Vec<ActivityRow>,
    last_updated: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl LocationRow {
    fn into_location(self, id: Uuid) -> Location {
        Location {
            id,
            name: self.name,
            capacity: self.capacity,
            is_active: self.is_active,
            activity_log: self
                .activity_log
                .into_iter()
                .map(ActivityRow::into_entry)
                .collect(),
            last_updated: self.last_updated,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl LocationRowWithId {
    fn try_into_location(self) -> Result<Location, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        Ok(Location {
            id,
            name: self.name,
            capacity: self.capacity,
            is_active: self.is_active,
            activity_log: self
                .activity_log
                .into_iter()
                .map(ActivityRow::into_entry)
                .collect(),
            last_updated: self.last_updated,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// Map a SurrealDB error to `AlreadyExists` when the unique name index
/// rejected the write; the pre-insert existence check catches most
/// duplicates, this catches the race.
fn map_name_conflict(err: surrealdb::Error) -> CoreError {
    if err.to_string().contains("idx_location_name") {
        CoreError::AlreadyExists {
            entity: "location".into(),
        }
    } else {
        DbError::from(err).into()
    }
}

/// SurrealDB implementation of the Location repository.
pub struct SurrealLocationRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> Clone for SurrealLocationRepository<C> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}

impl<C: Connection> SurrealLocationRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn fetch(&self, id: Uuid) -> CoreResult<Location> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('location', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<LocationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or(DbError::NotFound {
            entity: "location".into(),
            id: id_str,
        })?;

        Ok(row.into_location(id))
    }

    async fn list_where(&self, clause: &str) -> CoreResult<Vec<Location>> {
        let query = format!(
            "SELECT meta::id(id) AS record_id, * FROM location {clause} \
             ORDER BY created_at ASC"
        );

        let mut result = self.db.query(&query).await.map_err(DbError::from)?;
        let rows: Vec<LocationRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_location())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(items)
    }
}

impl<C: Connection> LocationRepository for SurrealLocationRepository<C> {
    async fn create(&self, input: CreateLocation) -> CoreResult<Location> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        // The unique index backs this check; it only exists to turn the
        // common duplicate into a clean conflict instead of an index
        // violation message.
        let mut existing = self
            .db
            .query("SELECT count() AS total FROM location WHERE name = $name GROUP ALL")
            .bind(("name", input.name.clone()))
            .await
            .map_err(DbError::from)?;
        let counts: Vec<CountRow> = existing.take(0).map_err(DbError::from)?;
        if counts.first().map(|r| r.total).unwrap_or(0) > 0 {
            return Err(CoreError::AlreadyExists {
                entity: "location".into(),
            });
        }

        let result = self
            .db
            .query(
                "CREATE type::record('location', $id) SET \
                 name = $name, \
                 capacity = $capacity, \
                 is_active = true, \
                 activity_log = []",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("capacity", input.capacity))
            .await
            .map_err(map_name_conflict)?;

        let mut result = result.check().map_err(map_name_conflict)?;

        let rows: Vec<LocationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or(DbError::NotFound {
            entity: "location".into(),
            id: id_str,
        })?;

        Ok(row.into_location(id))
    }

    async fn get_by_id(&self, id: Uuid) -> CoreResult<Location> {
        self.fetch(id).await
    }

    async fn list_active(&self) -> CoreResult<Vec<Location>> {
        self.list_where("WHERE is_active = true").await
    }

    async fn list_all(&self) -> CoreResult<Vec<Location>> {
        // No is_active filter: retention applies uniformly to active and
        // soft-deleted locations.
        self.list_where("").await
    }

    async fn update(&self, id: Uuid, input: UpdateLocation) -> CoreResult<Location> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.capacity.is_some() {
            sets.push("capacity = $capacity");
        }
        if input.is_active.is_some() {
            sets.push("is_active = $is_active");
        }
        sets.push("last_updated = time::now()");
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('location', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(capacity) = input.capacity {
            builder = builder.bind(("capacity", capacity));
        }
        if let Some(is_active) = input.is_active {
            builder = builder.bind(("is_active", is_active));
        }

        let result = builder.await.map_err(map_name_conflict)?;
        let mut result = result.check().map_err(map_name_conflict)?;

        let rows: Vec<LocationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or(DbError::NotFound {
            entity: "location".into(),
            id: id_str,
        })?;

        Ok(row.into_location(id))
    }

    async fn soft_delete(&self, id: Uuid) -> CoreResult<()> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "UPDATE type::record('location', $id) SET \
                 is_active = false, updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<LocationRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "location".into(),
                id: id_str,
            }
            .into());
        }

        Ok(())
    }

    async fn hard_delete(&self, id: Uuid) -> CoreResult<()> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("DELETE type::record('location', $id) RETURN BEFORE")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<LocationRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "location".into(),
                id: id_str,
            }
            .into());
        }

        Ok(())
    }

    async fn append_activity(
        &self,
        id: Uuid,
        level: CrowdLevel,
        organizer_id: &str,
    ) -> CoreResult<Location> {
        let id_str = id.to_string();

        // Additive write on the log field only; the timestamp comes from
        // the store clock, the same clock the sweeper's cutoff compares
        // against.
        let mut result = self
            .db
            .query(
                "UPDATE type::record('location', $id) SET \
                 activity_log += { \
                     crowd_level: $crowd_level, \
                     timestamp: time::now(), \
                     organizer_id: $organizer_id \
                 }, \
                 last_updated = time::now()",
            )
            .bind(("id", id_str.clone()))
            .bind(("crowd_level", level.as_str().to_string()))
            .bind(("organizer_id", organizer_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<LocationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or(DbError::NotFound {
            entity: "location".into(),
            id: id_str,
        })?;

        Ok(row.into_location(id))
    }

    async fn replace_log(&self, id: Uuid, entries: Vec<ActivityEntry>) -> CoreResult<Location> {
        let id_str = id.to_string();
        let log: Vec<ActivityRow> = entries.into_iter().map(ActivityRow::from_entry).collect();

        let mut result = self
            .db
            .query(
                "UPDATE type::record('location', $id) SET \
                 activity_log = $log, last_updated = time::now()",
            )
            .bind(("id", id_str.clone()))
            .bind(("log", log))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<LocationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or(DbError::NotFound {
            entity: "location".into(),
            id: id_str,
        })?;

        Ok(row.into_location(id))
    }

    async fn prune_older_than(&self, id: Uuid, cutoff: DateTime<Utc>) -> CoreResult<u64> {
        let id_str = id.to_string();

        // One conditional statement: the array filter and the staleness
        // guard both evaluate inside the store. When nothing is stale the
        // WHERE fails and the record is not written, so `last_updated`
        // does not move on a no-op sweep.
        let mut result = self
            .db
            .query(
                "UPDATE type::record('location', $id) SET \
                 activity_log = activity_log[WHERE timestamp > $cutoff], \
                 last_updated = time::now() \
                 WHERE count(activity_log[WHERE timestamp <= $cutoff]) > 0 \
                 RETURN BEFORE",
            )
            .bind(("id", id_str))
            .bind(("cutoff", cutoff))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<LocationRow> = result.take(0).map_err(DbError::from)?;
        let dropped = rows
            .first()
            .map(|before| {
                before
                    .activity_log
                    .iter()
                    .filter(|entry| entry.timestamp <= cutoff)
                    .count() as u64
            })
            .unwrap_or(0);

        Ok(dropped)
    }

    async fn clear_activities(&self, id: Uuid) -> CoreResult<ClearedLog> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "UPDATE type::record('location', $id) SET \
                 activity_log = [], last_updated = time::now() \
                 WHERE count(activity_log) > 0 \
                 RETURN BEFORE",
            )
            .bind(("id", id_str))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<LocationRow> = result.take(0).map_err(DbError::from)?;
        let Some(before) = rows.into_iter().next() else {
            // Nothing matched: either the location is missing (NotFound
            // from the fetch) or its log was already empty.
            self.fetch(id).await?;
            return Err(CoreError::InvalidOperation {
                message: "No activities to clear".into(),
            });
        };

        let cleared = before.activity_log.len() as u64;
        let location = self.fetch(id).await?;

        Ok(ClearedLog { cleared, location })
    }
}
