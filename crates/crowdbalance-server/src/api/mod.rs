//! HTTP API: request/response shapes, error mapping, and handlers.

pub mod error;
pub mod locations;
pub mod types;
