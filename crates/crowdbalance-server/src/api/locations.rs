//! Location handlers.
//!
//! Handlers stay thin: parse and validate input, call the repository,
//! shape the response. Scores are recomputed in the view layer on every
//! read, so two reads with no writes in between return identical bodies.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use crowdbalance_core::models::activity::CrowdLevel;
use crowdbalance_core::models::location::CreateLocation;
use crowdbalance_core::repository::{LocationRepository, OrganizerRepository};
use surrealdb::Connection;
use tracing::info;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{
    ActivityFeedView, ApiResponse, ClearedView, CreateLocationRequest, CrowdReportRequest,
    LocationOrganizersView, LocationView, UpdateLocationRequest,
};
use crate::app::AppState;

const DEFAULT_ORGANIZER_ID: &str = "organizer";

/// GET /locations: active locations with derived scores.
pub async fn list_locations<C: Connection>(
    State(state): State<AppState<C>>,
) -> Result<Json<ApiResponse<Vec<LocationView>>>, ApiError> {
    let locations = state.locations.list_active().await?;
    let views: Vec<LocationView> = locations.into_iter().map(LocationView::from).collect();
    Ok(Json(ApiResponse::data(views)))
}

/// POST /locations: create a location with an empty activity log.
pub async fn create_location<C: Connection>(
    State(state): State<AppState<C>>,
    body: Option<Json<CreateLocationRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<LocationView>>), ApiError> {
    let Some(Json(req)) = body else {
        return Err(ApiError::validation("Name and capacity are required"));
    };
    let (Some(name), Some(capacity)) = (req.name, req.capacity) else {
        return Err(ApiError::validation("Name and capacity are required"));
    };
    if name.trim().is_empty() {
        return Err(ApiError::validation("Name and capacity are required"));
    }

    let location = state
        .locations
        .create(CreateLocation {
            name: name.trim().to_string(),
            capacity,
        })
        .await?;

    info!(location = %location.name, "location created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Location added successfully",
            location.into(),
        )),
    ))
}

/// GET /locations/{id}: one location by id, active or not.
pub async fn get_location<C: Connection>(
    State(state): State<AppState<C>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<LocationView>>, ApiError> {
    let location = state.locations.get_by_id(id).await?;
    Ok(Json(ApiResponse::data(location.into())))
}

/// PUT /locations/{id}: partial attribute update.
pub async fn update_location<C: Connection>(
    State(state): State<AppState<C>>,
    Path(id): Path<Uuid>,
    body: Option<Json<UpdateLocationRequest>>,
) -> Result<Json<ApiResponse<LocationView>>, ApiError> {
    let Json(req) = body.unwrap_or_default();
    let location = state.locations.update(id, req.into()).await?;
    Ok(Json(ApiResponse::with_message(
        "Location updated successfully",
        location.into(),
    )))
}

/// PATCH /locations/{id}/crowd: append one crowd observation.
pub async fn report_crowd_level<C: Connection>(
    State(state): State<AppState<C>>,
    Path(id): Path<Uuid>,
    body: Option<Json<CrowdReportRequest>>,
) -> Result<Json<ApiResponse<LocationView>>, ApiError> {
    let level: CrowdLevel = body
        .as_ref()
        .and_then(|req| req.crowd_level.as_deref())
        .and_then(|raw| raw.parse().ok())
        .ok_or_else(|| {
            ApiError::validation("Invalid crowd level. Use: min, moderate, or max")
        })?;

    let organizer_id = body
        .and_then(|Json(req)| req.organizer_id)
        .unwrap_or_else(|| DEFAULT_ORGANIZER_ID.to_string());

    let location = state
        .locations
        .append_activity(id, level, &organizer_id)
        .await?;

    let view = LocationView::from(location);
    let message = format!(
        "{level} crowd level updated successfully. Total reports: {}",
        view.total_score
    );

    Ok(Json(ApiResponse::with_message(message, view)))
}

/// GET /locations/{id}/activities: the raw feed plus derived scores.
pub async fn get_location_activities<C: Connection>(
    State(state): State<AppState<C>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ActivityFeedView>>, ApiError> {
    let location = state.locations.get_by_id(id).await?;
    Ok(Json(ApiResponse::data(location.into())))
}

/// DELETE /locations/{id}/activities: empty the feed, reporting how many
/// entries were removed.
pub async fn clear_location_activities<C: Connection>(
    State(state): State<AppState<C>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ClearedView>>, ApiError> {
    let outcome = state.locations.clear_activities(id).await?;

    info!(
        location = %outcome.location.name,
        cleared = outcome.cleared,
        "activity log cleared"
    );

    let message = format!(
        "Successfully cleared {} activity reports from {}",
        outcome.cleared, outcome.location.name
    );
    let view = ClearedView {
        location_id: outcome.location.id,
        location_name: outcome.location.name,
        cleared_activities: outcome.cleared,
        last_updated: outcome.location.last_updated,
    };

    Ok(Json(ApiResponse::with_message(message, view)))
}

/// DELETE /locations/{id}: soft delete. The record and its log remain.
pub async fn soft_delete_location<C: Connection>(
    State(state): State<AppState<C>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.locations.soft_delete(id).await?;
    Ok(Json(ApiResponse::message_only(
        "Location deleted successfully",
    )))
}

/// DELETE /locations/{id}/permanent: physically remove the record.
pub async fn hard_delete_location<C: Connection>(
    State(state): State<AppState<C>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.locations.hard_delete(id).await?;
    info!(%id, "location permanently deleted");
    Ok(Json(ApiResponse::message_only(
        "Location permanently deleted",
    )))
}

/// GET /locations/{id}/organizers: the location together with the
/// organizers whose `assigned_hall` matches its name.
pub async fn get_location_organizers<C: Connection>(
    State(state): State<AppState<C>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<LocationOrganizersView>>, ApiError> {
    let location = state.locations.get_by_id(id).await?;
    let organizers = state
        .organizers
        .find_by_assigned_hall(&location.name)
        .await?;

    Ok(Json(ApiResponse::data(LocationOrganizersView {
        location: location.into(),
        organizers,
    })))
}
