//! Organizer boundary model.
//!
//! The user directory is an external collaborator; the core only depends
//! on the one lookup it needs, resolving a location's organizers by
//! matching `assigned_hall` against the location name. Credentials never
//! cross this boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organizer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Name of the location this organizer reports for. A string join
    /// key, not a foreign key: renaming the location orphans the
    /// assignment.
    pub assigned_hall: String,
    pub created_at: DateTime<Utc>,
}

/// Fields required to register an organizer assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrganizer {
    pub name: String,
    pub email: String,
    pub assigned_hall: String,
}
