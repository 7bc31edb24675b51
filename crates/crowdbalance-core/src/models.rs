//! Domain models for CrowdBalance.
//!
//! These are the core types shared across all crates.

pub mod activity;
pub mod location;
pub mod organizer;
