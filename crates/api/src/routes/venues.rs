//! Venue status endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use chrono::{DateTime, Utc};
use domain::UpdateVenueStatus;
use serde::{Deserialize, Serialize};
use venue_store::Venue;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct VenueStatusRequest {
    pub venue_name: String,
    pub is_sold_out: bool,
}

#[derive(Debug, Serialize)]
pub struct VenueResponse {
    pub id: String,
    pub name: String,
    pub is_sold_out: bool,
    pub is_first_sold_out: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Venue> for VenueResponse {
    fn from(venue: Venue) -> Self {
        Self {
            id: venue.id.to_string(),
            name: venue.name,
            is_sold_out: venue.is_sold_out,
            is_first_sold_out: venue.is_first_sold_out,
            created_at: venue.created_at,
            updated_at: venue.updated_at,
        }
    }
}

/// PUT /venues/status — operator sets a venue's sell-out status.
#[tracing::instrument(skip_all)]
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    body: Result<Json<VenueStatusRequest>, JsonRejection>,
) -> Result<Json<VenueResponse>, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let venue = state
        .venues
        .update_venue_status(UpdateVenueStatus::new(req.venue_name, req.is_sold_out))
        .await?;
    Ok(Json(venue.into()))
}

/// GET /venues — all live venues ordered by name.
#[tracing::instrument(skip_all)]
pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<VenueResponse>>, ApiError> {
    let venues = state.venues.list_venues().await?;
    Ok(Json(venues.into_iter().map(VenueResponse::from).collect()))
}

/// GET /venues/{name}
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<VenueResponse>, ApiError> {
    let venue = state.venues.get_venue(&name).await?;
    Ok(Json(venue.into()))
}
