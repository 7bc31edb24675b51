//! Retention sweeper tests: deterministic single cycles against an
//! in-memory SurrealDB, plus failure isolation via a faulty repository
//! wrapper.

use chrono::{DateTime, Duration, Utc};
use crowdbalance_core::error::{CoreError, CoreResult};
use crowdbalance_core::models::activity::{ActivityEntry, CrowdLevel};
use crowdbalance_core::models::location::{
    ClearedLog, CreateLocation, Location, UpdateLocation,
};
use crowdbalance_core::repository::LocationRepository;
use crowdbalance_db::repository::SurrealLocationRepository;
use crowdbalance_server::{SweepStats, Sweeper};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

type MemRepo = SurrealLocationRepository<surrealdb::engine::local::Db>;

async fn setup() -> MemRepo {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    crowdbalance_db::run_migrations(&db).await.unwrap();
    SurrealLocationRepository::new(db)
}

async fn create_hall(repo: &MemRepo, name: &str) -> Uuid {
    repo.create(CreateLocation {
        name: name.into(),
        capacity: 100,
    })
    .await
    .unwrap()
    .id
}

fn entry_aged(level: &str, minutes_ago: i64) -> ActivityEntry {
    ActivityEntry {
        crowd_level: level.into(),
        timestamp: Utc::now() - Duration::minutes(minutes_ago),
        organizer_id: "organizer".into(),
    }
}

#[tokio::test]
async fn cycle_prunes_entries_past_the_horizon() {
    let repo = setup().await;
    let id = create_hall(&repo, "Hall A").await;

    // Ages 10, 70, and 200 minutes against a one-hour horizon.
    repo.replace_log(
        id,
        vec![
            entry_aged("min", 10),
            entry_aged("moderate", 70),
            entry_aged("max", 200),
        ],
    )
    .await
    .unwrap();

    let sweeper = Sweeper::new(repo.clone(), 3600);
    let stats = sweeper.run_cycle().await;

    assert_eq!(
        stats,
        SweepStats {
            locations: 1,
            pruned: 2,
            failures: 0
        }
    );

    let location = repo.get_by_id(id).await.unwrap();
    assert_eq!(location.activity_log.len(), 1);
    assert_eq!(location.activity_log[0].crowd_level, "min");
}

#[tokio::test]
async fn second_cycle_is_a_no_op() {
    let repo = setup().await;
    let id = create_hall(&repo, "Hall A").await;

    repo.replace_log(id, vec![entry_aged("min", 10), entry_aged("max", 90)])
        .await
        .unwrap();

    let sweeper = Sweeper::new(repo.clone(), 3600);
    assert_eq!(sweeper.run_cycle().await.pruned, 1);
    let first = repo.get_by_id(id).await.unwrap();

    let stats = sweeper.run_cycle().await;
    assert_eq!(stats.pruned, 0);
    assert_eq!(stats.failures, 0);

    // Nothing stale means no write: last_updated does not move.
    let second = repo.get_by_id(id).await.unwrap();
    assert_eq!(second.last_updated, first.last_updated);
}

#[tokio::test]
async fn sweep_covers_soft_deleted_locations() {
    let repo = setup().await;
    let active = create_hall(&repo, "Hall A").await;
    let hidden = create_hall(&repo, "Hall B").await;

    repo.replace_log(active, vec![entry_aged("min", 90)])
        .await
        .unwrap();
    repo.replace_log(hidden, vec![entry_aged("max", 90)])
        .await
        .unwrap();
    repo.soft_delete(hidden).await.unwrap();

    let sweeper = Sweeper::new(repo.clone(), 3600);
    let stats = sweeper.run_cycle().await;

    assert_eq!(stats.locations, 2);
    assert_eq!(stats.pruned, 2);
    assert!(
        repo.get_by_id(hidden)
            .await
            .unwrap()
            .activity_log
            .is_empty()
    );
}

#[tokio::test]
async fn fresh_appends_survive_a_sweep() {
    let repo = setup().await;
    let id = create_hall(&repo, "Hall A").await;

    repo.append_activity(id, CrowdLevel::Moderate, "organizer")
        .await
        .unwrap();

    let sweeper = Sweeper::new(repo.clone(), 3600);
    let stats = sweeper.run_cycle().await;

    assert_eq!(stats.pruned, 0);
    assert_eq!(repo.get_by_id(id).await.unwrap().activity_log.len(), 1);
}

// -----------------------------------------------------------------------
// Failure isolation
// -----------------------------------------------------------------------

/// Repository wrapper that fails specific operations, for exercising the
/// sweeper's error handling without a real store fault.
#[derive(Clone)]
struct FaultyRepo {
    inner: MemRepo,
    fail_prune_for: Option<Uuid>,
    fail_list: bool,
}

impl LocationRepository for FaultyRepo {
    async fn create(&self, input: CreateLocation) -> CoreResult<Location> {
        self.inner.create(input).await
    }

    async fn get_by_id(&self, id: Uuid) -> CoreResult<Location> {
        self.inner.get_by_id(id).await
    }

    async fn list_active(&self) -> CoreResult<Vec<Location>> {
        self.inner.list_active().await
    }

    async fn list_all(&self) -> CoreResult<Vec<Location>> {
        if self.fail_list {
            return Err(CoreError::Database("enumeration failed".into()));
        }
        self.inner.list_all().await
    }

    async fn update(&self, id: Uuid, input: UpdateLocation) -> CoreResult<Location> {
        self.inner.update(id, input).await
    }

    async fn soft_delete(&self, id: Uuid) -> CoreResult<()> {
        self.inner.soft_delete(id).await
    }

    async fn hard_delete(&self, id: Uuid) -> CoreResult<()> {
        self.inner.hard_delete(id).await
    }

    async fn append_activity(
        &self,
        id: Uuid,
        level: CrowdLevel,
        organizer_id: &str,
    ) -> CoreResult<Location> {
        self.inner.append_activity(id, level, organizer_id).await
    }

    async fn replace_log(&self, id: Uuid, entries: Vec<ActivityEntry>) -> CoreResult<Location> {
        self.inner.replace_log(id, entries).await
    }

    async fn prune_older_than(&self, id: Uuid, cutoff: DateTime<Utc>) -> CoreResult<u64> {
        if self.fail_prune_for == Some(id) {
            return Err(CoreError::Database("write refused".into()));
        }
        self.inner.prune_older_than(id, cutoff).await
    }

    async fn clear_activities(&self, id: Uuid) -> CoreResult<ClearedLog> {
        self.inner.clear_activities(id).await
    }
}

#[tokio::test]
async fn one_failing_location_does_not_abort_the_cycle() {
    let repo = setup().await;
    let bad = create_hall(&repo, "Hall A").await;
    let good = create_hall(&repo, "Hall B").await;

    repo.replace_log(bad, vec![entry_aged("min", 90)])
        .await
        .unwrap();
    repo.replace_log(good, vec![entry_aged("max", 90)])
        .await
        .unwrap();

    let faulty = FaultyRepo {
        inner: repo.clone(),
        fail_prune_for: Some(bad),
        fail_list: false,
    };
    let sweeper = Sweeper::new(faulty, 3600);
    let stats = sweeper.run_cycle().await;

    assert_eq!(stats.locations, 2);
    assert_eq!(stats.pruned, 1);
    assert_eq!(stats.failures, 1);

    // The healthy location was still swept.
    assert!(repo.get_by_id(good).await.unwrap().activity_log.is_empty());
    assert_eq!(repo.get_by_id(bad).await.unwrap().activity_log.len(), 1);
}

#[tokio::test]
async fn enumeration_failure_skips_the_cycle() {
    let repo = setup().await;
    let id = create_hall(&repo, "Hall A").await;
    repo.replace_log(id, vec![entry_aged("min", 90)])
        .await
        .unwrap();

    let faulty = FaultyRepo {
        inner: repo.clone(),
        fail_prune_for: None,
        fail_list: true,
    };
    let sweeper = Sweeper::new(faulty, 3600);
    let stats = sweeper.run_cycle().await;

    assert_eq!(stats, SweepStats::default());
    assert_eq!(repo.get_by_id(id).await.unwrap().activity_log.len(), 1);
}

#[tokio::test]
async fn spawned_sweeper_shuts_down_cleanly() {
    let repo = setup().await;
    let sweeper = Sweeper::new(repo, 3600);

    let handle = sweeper.spawn(std::time::Duration::from_secs(300));
    handle.shutdown().await;
}
