//! Integration tests for the Location repository implementation using
//! in-memory SurrealDB.

use crowdbalance_core::error::CoreError;
use crowdbalance_core::models::location::{CreateLocation, UpdateLocation};
use crowdbalance_core::repository::LocationRepository;
use crowdbalance_db::repository::SurrealLocationRepository;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

/// Helper: spin up in-memory DB and run migrations.
async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    crowdbalance_db::run_migrations(&db).await.unwrap();
    db
}

#[tokio::test]
async fn create_and_get_location() {
    let db = setup().await;
    let repo = SurrealLocationRepository::new(db);

    let location = repo
        .create(CreateLocation {
            name: "Hall A".into(),
            capacity: 100,
        })
        .await
        .unwrap();

    assert_eq!(location.name, "Hall A");
    assert_eq!(location.capacity, 100);
    assert!(location.is_active);
    assert!(location.activity_log.is_empty());

    let fetched = repo.get_by_id(location.id).await.unwrap();
    assert_eq!(fetched.id, location.id);
    assert_eq!(fetched.name, location.name);
    assert_eq!(fetched.capacity, location.capacity);
}

#[tokio::test]
async fn get_missing_location_is_not_found() {
    let db = setup().await;
    let repo = SurrealLocationRepository::new(db);

    let result = repo.get_by_id(Uuid::new_v4()).await;
    assert!(matches!(result, Err(CoreError::NotFound { .. })));
}

#[tokio::test]
async fn duplicate_location_name_rejected() {
    let db = setup().await;
    let repo = SurrealLocationRepository::new(db);

    let first = repo
        .create(CreateLocation {
            name: "Hall A".into(),
            capacity: 100,
        })
        .await
        .unwrap();

    let result = repo
        .create(CreateLocation {
            name: "Hall A".into(),
            capacity: 250,
        })
        .await;
    assert!(matches!(result, Err(CoreError::AlreadyExists { .. })));

    // The first location must be unaffected.
    let fetched = repo.get_by_id(first.id).await.unwrap();
    assert_eq!(fetched.capacity, 100);
}

#[tokio::test]
async fn update_location_attributes() {
    let db = setup().await;
    let repo = SurrealLocationRepository::new(db);

    let location = repo
        .create(CreateLocation {
            name: "Hall B".into(),
            capacity: 50,
        })
        .await
        .unwrap();

    let updated = repo
        .update(
            location.id,
            UpdateLocation {
                capacity: Some(75),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.id, location.id);
    assert_eq!(updated.capacity, 75);
    assert_eq!(updated.name, "Hall B"); // unchanged
    assert!(updated.last_updated >= location.last_updated);
}

#[tokio::test]
async fn update_missing_location_is_not_found() {
    let db = setup().await;
    let repo = SurrealLocationRepository::new(db);

    let result = repo
        .update(
            Uuid::new_v4(),
            UpdateLocation {
                capacity: Some(10),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(CoreError::NotFound { .. })));
}

#[tokio::test]
async fn soft_delete_hides_from_listing_but_not_lookup() {
    let db = setup().await;
    let repo = SurrealLocationRepository::new(db);

    let kept = repo
        .create(CreateLocation {
            name: "Hall A".into(),
            capacity: 100,
        })
        .await
        .unwrap();
    let deleted = repo
        .create(CreateLocation {
            name: "Hall B".into(),
            capacity: 200,
        })
        .await
        .unwrap();

    repo.soft_delete(deleted.id).await.unwrap();

    let active = repo.list_active().await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, kept.id);

    // Still reachable by direct lookup, and still enumerated for sweeps.
    let fetched = repo.get_by_id(deleted.id).await.unwrap();
    assert!(!fetched.is_active);

    let all = repo.list_all().await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn hard_delete_removes_the_record() {
    let db = setup().await;
    let repo = SurrealLocationRepository::new(db);

    let location = repo
        .create(CreateLocation {
            name: "Ephemeral".into(),
            capacity: 10,
        })
        .await
        .unwrap();

    repo.hard_delete(location.id).await.unwrap();

    let result = repo.get_by_id(location.id).await;
    assert!(matches!(result, Err(CoreError::NotFound { .. })));

    let all = repo.list_all().await.unwrap();
    assert!(all.is_empty());
}

#[tokio::test]
async fn hard_delete_missing_location_is_not_found() {
    let db = setup().await;
    let repo = SurrealLocationRepository::new(db);

    let result = repo.hard_delete(Uuid::new_v4()).await;
    assert!(matches!(result, Err(CoreError::NotFound { .. })));
}
