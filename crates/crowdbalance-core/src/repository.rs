//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. These traits are the seam
//! between the domain and the store; the retention sweeper is generic
//! over [`LocationRepository`] so tests can drive it against a stub.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::CoreResult;
use crate::models::activity::{ActivityEntry, CrowdLevel};
use crate::models::location::{ClearedLog, CreateLocation, Location, UpdateLocation};
use crate::models::organizer::{CreateOrganizer, Organizer};

pub trait LocationRepository: Send + Sync {
    /// Create a location with an empty activity log.
    /// Fails with `AlreadyExists` on a duplicate name.
    fn create(&self, input: CreateLocation) -> impl Future<Output = CoreResult<Location>> + Send;

    /// Resolve a location by id, active or not.
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = CoreResult<Location>> + Send;

    /// Locations visible to clients: active only.
    fn list_active(&self) -> impl Future<Output = CoreResult<Vec<Location>>> + Send;

    /// Every location regardless of `is_active`. The retention policy
    /// applies uniformly, so the sweeper enumerates through this.
    fn list_all(&self) -> impl Future<Output = CoreResult<Vec<Location>>> + Send;

    fn update(
        &self,
        id: Uuid,
        input: UpdateLocation,
    ) -> impl Future<Output = CoreResult<Location>> + Send;

    /// Soft-delete: flips `is_active` to false. The record and its log
    /// remain in the store.
    fn soft_delete(&self, id: Uuid) -> impl Future<Output = CoreResult<()>> + Send;

    /// Physically remove the record. Administrative cleanup only; the
    /// primary delete flow is [`soft_delete`](Self::soft_delete).
    fn hard_delete(&self, id: Uuid) -> impl Future<Output = CoreResult<()>> + Send;

    /// Append one observation stamped with store time. A purely additive
    /// single-field write: it never round-trips the existing log, so it
    /// cannot clobber concurrent writes to other fields.
    fn append_activity(
        &self,
        id: Uuid,
        level: CrowdLevel,
        organizer_id: &str,
    ) -> impl Future<Output = CoreResult<Location>> + Send;

    /// Overwrite the activity log wholesale. Writes only `activity_log`
    /// and `last_updated`.
    fn replace_log(
        &self,
        id: Uuid,
        entries: Vec<ActivityEntry>,
    ) -> impl Future<Output = CoreResult<Location>> + Send;

    /// Drop entries with `timestamp <= cutoff` in one atomic filtered
    /// update; an append landing mid-sweep is never lost. Issues no
    /// write at all when nothing is stale. Returns the dropped count.
    fn prune_older_than(
        &self,
        id: Uuid,
        cutoff: DateTime<Utc>,
    ) -> impl Future<Output = CoreResult<u64>> + Send;

    /// Empty the activity log. Fails with `InvalidOperation` when the
    /// log is already empty, distinguishing "nothing to do" from
    /// "succeeded".
    fn clear_activities(&self, id: Uuid) -> impl Future<Output = CoreResult<ClearedLog>> + Send;
}

pub trait OrganizerRepository: Send + Sync {
    fn create(&self, input: CreateOrganizer)
    -> impl Future<Output = CoreResult<Organizer>> + Send;

    /// Organizers assigned to a location, matched by `assigned_hall`
    /// string equality against the location name. This is the one place
    /// the name-based join lives: a location rename silently orphans
    /// assignments, preserved here as documented behavior.
    fn find_by_assigned_hall(
        &self,
        hall: &str,
    ) -> impl Future<Output = CoreResult<Vec<Organizer>>> + Send;
}
