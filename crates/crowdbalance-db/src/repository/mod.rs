//! SurrealDB repository implementations.

mod location;
mod organizer;

pub use location::SurrealLocationRepository;
pub use organizer::SurrealOrganizerRepository;
