//! Application state and router assembly.

use axum::Router;
use axum::routing::{delete, get, patch};
use crowdbalance_db::repository::{SurrealLocationRepository, SurrealOrganizerRepository};
use surrealdb::{Connection, Surreal};
use tower_http::trace::TraceLayer;

use crate::api::locations;

/// Shared handler state. Generic over the SurrealDB engine so the test
/// suite runs the full router against the in-memory engine.
pub struct AppState<C: Connection> {
    pub locations: SurrealLocationRepository<C>,
    pub organizers: SurrealOrganizerRepository<C>,
}

impl<C: Connection> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            locations: self.locations.clone(),
            organizers: self.organizers.clone(),
        }
    }
}

impl<C: Connection> AppState<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self {
            locations: SurrealLocationRepository::new(db.clone()),
            organizers: SurrealOrganizerRepository::new(db),
        }
    }
}

/// Build the API router over the given state.
pub fn build_router<C: Connection>(state: AppState<C>) -> Router {
    Router::new()
        .route(
            "/locations",
            get(locations::list_locations).post(locations::create_location),
        )
        .route(
            "/locations/{id}",
            get(locations::get_location)
                .put(locations::update_location)
                .delete(locations::soft_delete_location),
        )
        .route(
            "/locations/{id}/permanent",
            delete(locations::hard_delete_location),
        )
        .route("/locations/{id}/crowd", patch(locations::report_crowd_level))
        .route(
            "/locations/{id}/activities",
            get(locations::get_location_activities)
                .delete(locations::clear_location_activities),
        )
        .route(
            "/locations/{id}/organizers",
            get(locations::get_location_organizers),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
