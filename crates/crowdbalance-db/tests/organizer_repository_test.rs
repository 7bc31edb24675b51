//! Integration tests for the Organizer repository and the name-based
//! join against locations, using in-memory SurrealDB.

use crowdbalance_core::models::location::{CreateLocation, UpdateLocation};
use crowdbalance_core::models::organizer::CreateOrganizer;
use crowdbalance_core::repository::{LocationRepository, OrganizerRepository};
use crowdbalance_db::repository::{SurrealLocationRepository, SurrealOrganizerRepository};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

/// Helper: spin up in-memory DB and run migrations.
async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    crowdbalance_db::run_migrations(&db).await.unwrap();
    db
}

#[tokio::test]
async fn create_and_find_by_assigned_hall() {
    let db = setup().await;
    let repo = SurrealOrganizerRepository::new(db);

    repo.create(CreateOrganizer {
        name: "Alex".into(),
        email: "alex@example.com".into(),
        assigned_hall: "Hall A".into(),
    })
    .await
    .unwrap();
    repo.create(CreateOrganizer {
        name: "Sam".into(),
        email: "sam@example.com".into(),
        assigned_hall: "Hall A".into(),
    })
    .await
    .unwrap();
    repo.create(CreateOrganizer {
        name: "Kim".into(),
        email: "kim@example.com".into(),
        assigned_hall: "Hall B".into(),
    })
    .await
    .unwrap();

    let hall_a = repo.find_by_assigned_hall("Hall A").await.unwrap();
    assert_eq!(hall_a.len(), 2);
    assert!(hall_a.iter().all(|o| o.assigned_hall == "Hall A"));

    let hall_c = repo.find_by_assigned_hall("Hall C").await.unwrap();
    assert!(hall_c.is_empty());
}

#[tokio::test]
async fn renaming_a_location_orphans_its_organizers() {
    // Documented behavior of the name-based join, not a desired one: the
    // assignment keys on the old name and silently stops resolving.
    let db = setup().await;
    let locations = SurrealLocationRepository::new(db.clone());
    let organizers = SurrealOrganizerRepository::new(db);

    let hall = locations
        .create(CreateLocation {
            name: "Hall A".into(),
            capacity: 100,
        })
        .await
        .unwrap();
    organizers
        .create(CreateOrganizer {
            name: "Alex".into(),
            email: "alex@example.com".into(),
            assigned_hall: "Hall A".into(),
        })
        .await
        .unwrap();

    let renamed = locations
        .update(
            hall.id,
            UpdateLocation {
                name: Some("Hall Alpha".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let found = organizers
        .find_by_assigned_hall(&renamed.name)
        .await
        .unwrap();
    assert!(found.is_empty(), "assignment keys on the old name");

    let orphaned = organizers.find_by_assigned_hall("Hall A").await.unwrap();
    assert_eq!(orphaned.len(), 1);
}
