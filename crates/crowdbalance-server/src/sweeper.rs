//! Retention sweeper.
//!
//! A background task that periodically drops activity entries older than
//! the retention horizon from every location, active or soft-deleted.
//! The sweep itself is a plain async method so tests drive single cycles
//! deterministically; the spawned loop only adds the timer and shutdown
//! plumbing around it.

use std::time::Duration;

use chrono::Utc;
use crowdbalance_core::repository::LocationRepository;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

/// Outcome of one sweep cycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepStats {
    /// Locations enumerated this cycle.
    pub locations: u64,
    /// Activity entries dropped across all locations.
    pub pruned: u64,
    /// Locations whose prune failed. Failures are isolated per location;
    /// one bad record never aborts the cycle.
    pub failures: u64,
}

/// Prunes stale activity entries across all locations.
pub struct Sweeper<R> {
    repo: R,
    horizon_secs: u64,
}

impl<R: LocationRepository + 'static> Sweeper<R> {
    pub fn new(repo: R, horizon_secs: u64) -> Self {
        Self { repo, horizon_secs }
    }

    /// Run one sweep cycle: enumerate every location and prune entries at
    /// or older than `now - horizon`. An enumeration failure skips the
    /// cycle entirely; the next tick retries.
    pub async fn run_cycle(&self) -> SweepStats {
        let cutoff = Utc::now() - chrono::Duration::seconds(self.horizon_secs as i64);

        let locations = match self.repo.list_all().await {
            Ok(locations) => locations,
            Err(err) => {
                error!(error = %err, "sweep cycle skipped: could not enumerate locations");
                return SweepStats::default();
            }
        };

        let mut stats = SweepStats {
            locations: locations.len() as u64,
            ..SweepStats::default()
        };

        for location in locations {
            match self.repo.prune_older_than(location.id, cutoff).await {
                Ok(dropped) => {
                    if dropped > 0 {
                        debug!(location = %location.name, dropped, "pruned stale activity entries");
                    }
                    stats.pruned += dropped;
                }
                Err(err) => {
                    warn!(location = %location.name, error = %err, "prune failed, continuing sweep");
                    stats.failures += 1;
                }
            }
        }

        if stats.pruned > 0 || stats.failures > 0 {
            info!(
                locations = stats.locations,
                pruned = stats.pruned,
                failures = stats.failures,
                "sweep cycle finished"
            );
        }

        stats
    }

    /// Spawn the periodic sweep loop. The returned handle owns the task;
    /// dropping it without calling [`SweeperHandle::shutdown`] leaves the
    /// task running until the runtime shuts down.
    pub fn spawn(self, interval: Duration) -> SweeperHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // A stalled runtime should not be followed by a burst of
            // back-to-back sweeps.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        self.run_cycle().await;
                    }
                    _ = stop_rx.changed() => {
                        info!("retention sweeper stopping");
                        break;
                    }
                }
            }
        });

        SweeperHandle { stop_tx, task }
    }
}

/// Owned handle to a running sweeper task.
pub struct SweeperHandle {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Signal the loop to stop and wait for it to finish.
    pub async fn shutdown(self) {
        let _ = self.stop_tx.send(true);
        let _ = self.task.await;
    }
}
