//! CrowdBalance Core — domain models, crowd-score aggregation, and
//! repository trait definitions shared across all crates.

pub mod error;
pub mod models;
pub mod repository;
pub mod score;

pub use error::{CoreError, CoreResult};
pub use score::{CrowdScores, aggregate};
