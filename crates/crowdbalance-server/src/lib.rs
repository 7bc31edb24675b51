//! CrowdBalance Server — HTTP API over the location store plus the
//! retention sweeper background task.

pub mod api;
pub mod app;
pub mod config;
pub mod sweeper;

pub use app::{AppState, build_router};
pub use config::ServerConfig;
pub use sweeper::{SweepStats, Sweeper, SweeperHandle};
