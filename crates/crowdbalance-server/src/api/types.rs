//! Wire-format request and response types.
//!
//! Responses carry the original API's camelCase field names so existing
//! panel and mobile clients keep working. Derived scores appear here and
//! only here: they are computed per response, never persisted.

use chrono::{DateTime, Utc};
use crowdbalance_core::models::activity::ActivityEntry;
use crowdbalance_core::models::location::{Location, UpdateLocation};
use crowdbalance_core::models::organizer::Organizer;
use crowdbalance_core::{CrowdScores, aggregate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Success envelope: `{ "success": true, "message"?, "data" }`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }

    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }
}

// -----------------------------------------------------------------------
// Requests
// -----------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CreateLocationRequest {
    pub name: Option<String>,
    pub capacity: Option<i64>,
}

/// Partial attribute update. Score fields have no representation here,
/// so a payload carrying them loses them at deserialization instead of
/// being filtered at runtime.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLocationRequest {
    pub name: Option<String>,
    pub capacity: Option<i64>,
    pub is_active: Option<bool>,
}

impl From<UpdateLocationRequest> for UpdateLocation {
    fn from(req: UpdateLocationRequest) -> Self {
        UpdateLocation {
            name: req.name,
            capacity: req.capacity,
            is_active: req.is_active,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrowdReportRequest {
    pub crowd_level: Option<String>,
    /// Identifier of the reporting actor; defaults to a placeholder when
    /// absent (no verified identity in the current design).
    pub organizer_id: Option<String>,
}

// -----------------------------------------------------------------------
// Responses
// -----------------------------------------------------------------------

/// Score block in the shape of the original API's `calculatedScores`.
#[derive(Debug, Serialize)]
pub struct ScoresBody {
    #[serde(rename = "minCrowdScore")]
    pub min_crowd_score: u64,
    #[serde(rename = "moderateCrowdScore")]
    pub moderate_crowd_score: u64,
    #[serde(rename = "maxCrowdScore")]
    pub max_crowd_score: u64,
    pub total: u64,
}

impl From<CrowdScores> for ScoresBody {
    fn from(scores: CrowdScores) -> Self {
        Self {
            min_crowd_score: scores.min,
            moderate_crowd_score: scores.moderate,
            max_crowd_score: scores.max,
            total: scores.total,
        }
    }
}

/// A location composed with its derived scores, the shape every read
/// path returns.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationView {
    pub id: Uuid,
    pub name: String,
    pub capacity: i64,
    pub is_active: bool,
    pub activity_log: Vec<ActivityEntry>,
    pub last_updated: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub min_crowd_score: u64,
    pub moderate_crowd_score: u64,
    pub max_crowd_score: u64,
    pub total_score: u64,
}

impl From<Location> for LocationView {
    fn from(location: Location) -> Self {
        let scores = aggregate(&location.activity_log);
        Self {
            id: location.id,
            name: location.name,
            capacity: location.capacity,
            is_active: location.is_active,
            activity_log: location.activity_log,
            last_updated: location.last_updated,
            created_at: location.created_at,
            updated_at: location.updated_at,
            min_crowd_score: scores.min,
            moderate_crowd_score: scores.moderate,
            max_crowd_score: scores.max,
            total_score: scores.total,
        }
    }
}

/// Raw activity feed for a location.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityFeedView {
    pub location_name: String,
    pub activities: Vec<ActivityEntry>,
    pub calculated_scores: ScoresBody,
    pub last_updated: DateTime<Utc>,
}

impl From<Location> for ActivityFeedView {
    fn from(location: Location) -> Self {
        let scores = aggregate(&location.activity_log);
        Self {
            location_name: location.name,
            activities: location.activity_log,
            calculated_scores: scores.into(),
            last_updated: location.last_updated,
        }
    }
}

/// Result of clearing a location's activity feed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearedView {
    pub location_id: Uuid,
    pub location_name: String,
    pub cleared_activities: u64,
    pub last_updated: DateTime<Utc>,
}

/// A location together with the organizers assigned to it by name.
#[derive(Debug, Serialize)]
pub struct LocationOrganizersView {
    #[serde(flatten)]
    pub location: LocationView,
    pub organizers: Vec<Organizer>,
}
