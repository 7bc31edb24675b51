//! Location domain model.
//!
//! A location is one physical venue. Its `activity_log` is append-only
//! from the organizer reporting path; the only subtractive writers are
//! the retention sweeper and the explicit clear-activities operation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::activity::ActivityEntry;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub id: Uuid,
    /// Unique venue name. Organizer assignments join on this name, so a
    /// rename silently orphans them (see `OrganizerRepository`).
    pub name: String,
    pub capacity: i64,
    /// Soft-delete flag. Inactive locations are hidden from listings but
    /// stay reachable by direct lookup and are still swept.
    pub is_active: bool,
    pub activity_log: Vec<ActivityEntry>,
    /// Moves whenever the activity log or the attributes change.
    pub last_updated: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a new location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLocation {
    pub name: String,
    pub capacity: i64,
}

/// Fields that can be updated on an existing location.
///
/// Derived score fields are not representable here: anything else in an
/// update payload is dropped at deserialization instead of filtered at
/// runtime.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateLocation {
    pub name: Option<String>,
    pub capacity: Option<i64>,
    pub is_active: Option<bool>,
}

/// Outcome of a clear-activities operation.
#[derive(Debug, Clone)]
pub struct ClearedLog {
    /// Number of entries removed. Always at least one: clearing an empty
    /// log is rejected as an invalid operation rather than a no-op.
    pub cleared: u64,
    /// The location as it stands after the clear.
    pub location: Location,
}
