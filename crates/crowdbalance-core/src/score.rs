//! Crowd-score aggregation.
//!
//! Scores are a view, never state: every read folds the activity log
//! again rather than trusting a stored counter.

use serde::{Deserialize, Serialize};

use crate::models::activity::{ActivityEntry, CrowdLevel};

/// Per-level observation counts derived from an activity log.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CrowdScores {
    pub min: u64,
    pub moderate: u64,
    pub max: u64,
    /// Always `min + moderate + max`. May be less than the raw log length
    /// when entries carry unrecognized levels.
    pub total: u64,
}

/// Fold an activity log into per-level counts.
///
/// Commutative and side-effect free; entry order does not matter.
/// Entries whose `crowd_level` is outside the known set are skipped, not
/// errors, so stores written by newer deployments keep aggregating.
pub fn aggregate(entries: &[ActivityEntry]) -> CrowdScores {
    let mut scores = CrowdScores::default();
    for entry in entries {
        match entry.level() {
            Some(CrowdLevel::Min) => scores.min += 1,
            Some(CrowdLevel::Moderate) => scores.moderate += 1,
            Some(CrowdLevel::Max) => scores.max += 1,
            None => {}
        }
    }
    scores.total = scores.min + scores.moderate + scores.max;
    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(level: &str) -> ActivityEntry {
        ActivityEntry {
            crowd_level: level.into(),
            timestamp: Utc::now(),
            organizer_id: "organizer".into(),
        }
    }

    #[test]
    fn empty_log_yields_all_zeros() {
        assert_eq!(aggregate(&[]), CrowdScores::default());
    }

    #[test]
    fn total_equals_sum_of_category_counts() {
        let log = vec![
            entry("min"),
            entry("min"),
            entry("moderate"),
            entry("max"),
            entry("max"),
            entry("max"),
        ];
        let scores = aggregate(&log);
        assert_eq!(scores.min, 2);
        assert_eq!(scores.moderate, 1);
        assert_eq!(scores.max, 3);
        assert_eq!(scores.total, scores.min + scores.moderate + scores.max);
        assert_eq!(scores.total, log.len() as u64);
    }

    #[test]
    fn appending_one_entry_increments_exactly_one_count() {
        let mut log = vec![entry("min"), entry("moderate")];
        let before = aggregate(&log);

        log.push(entry("max"));
        let after = aggregate(&log);

        assert_eq!(after.max, before.max + 1);
        assert_eq!(after.min, before.min);
        assert_eq!(after.moderate, before.moderate);
        assert_eq!(after.total, before.total + 1);
    }

    #[test]
    fn unrecognized_levels_are_skipped_not_errors() {
        let log = vec![entry("min"), entry("extreme"), entry("max")];
        let scores = aggregate(&log);
        assert_eq!(scores.min, 1);
        assert_eq!(scores.max, 1);
        assert_eq!(scores.moderate, 0);
        assert_eq!(scores.total, 2);
    }

    #[test]
    fn fold_is_order_independent() {
        let forward = vec![entry("min"), entry("moderate"), entry("max")];
        let reversed: Vec<_> = forward.iter().rev().cloned().collect();
        assert_eq!(aggregate(&forward), aggregate(&reversed));
    }
}
