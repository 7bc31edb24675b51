//! Activity log domain model.
//!
//! The activity log is the single persisted source of truth for a
//! location's crowd state. Every derived score is recomputed from it on
//! read and never stored.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Qualitative crowd level reported by an organizer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CrowdLevel {
    Min,
    Moderate,
    Max,
}

impl CrowdLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CrowdLevel::Min => "min",
            CrowdLevel::Moderate => "moderate",
            CrowdLevel::Max => "max",
        }
    }
}

impl fmt::Display for CrowdLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CrowdLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "min" => Ok(CrowdLevel::Min),
            "moderate" => Ok(CrowdLevel::Moderate),
            "max" => Ok(CrowdLevel::Max),
            _ => Err(()),
        }
    }
}

/// One crowd observation embedded in a location's activity log.
///
/// `crowd_level` stays a free string at this level: the append path
/// validates it against [`CrowdLevel`], while readers tolerate values
/// outside the current set so future levels can be introduced without a
/// model bump on every client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub crowd_level: String,
    pub timestamp: DateTime<Utc>,
    /// Identifier of the reporting actor. Not a verified identity in the
    /// current design; defaults to a placeholder when the caller supplies
    /// none.
    pub organizer_id: String,
}

impl ActivityEntry {
    /// Parsed crowd level, or `None` for unrecognized values.
    pub fn level(&self) -> Option<CrowdLevel> {
        self.crowd_level.parse().ok()
    }
}
