//! Ticket availability and sold-out reporting endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use domain::TicketSoldOut;
use recommendation::OnlineTicket;
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct OnlineTicketParams {
    pub region_name: String,
}

#[derive(Debug, Deserialize)]
pub struct SoldOutRequest {
    pub venue_name: String,
    pub is_sold_out: bool,
}

/// GET /tickets/online?region_name= — whether a region sells online only.
#[tracing::instrument(skip_all)]
pub async fn online(
    State(state): State<Arc<AppState>>,
    params: Result<Query<OnlineTicketParams>, QueryRejection>,
) -> Result<Json<OnlineTicket>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let online = state.pipeline.get_online_ticket(&params.region_name).await?;
    Ok(Json(online))
}

/// POST /tickets/sold-out — ticket sales report a venue's sell-out status.
#[tracing::instrument(skip_all)]
pub async fn sold_out(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SoldOutRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    state
        .venues
        .update_ticket_sold_out(TicketSoldOut::new(req.venue_name, req.is_sold_out))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
