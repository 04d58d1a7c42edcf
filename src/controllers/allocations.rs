//! allocations.rs
//!
//! Endpoints that seat a party.
//!
//! The venue lock is held from the search for seats until they are committed,
//! so two requests can never be handed the same run.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::models::{Event, Level, Run, SeatId};
use crate::services::{Allocation, Strategy};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/allocations", post(create_allocation))
        .route("/allocations/preview", post(preview_allocation))
}

/* ---------- helpers ---------- */

#[derive(Debug, Deserialize, Validate)]
pub struct AllocationRequest {
    #[validate(range(min = 1, message = "party_size must be at least 1"))]
    pub party_size: usize,
    pub level: Option<Level>,
    pub areas: Option<Vec<u16>>,
}

#[derive(Debug, Serialize)]
struct RunResponse {
    area: u16,
    row: u16,
    from_column: u16,
    to_column: u16,
    length: usize,
}

impl From<&Run> for RunResponse {
    fn from(run: &Run) -> Self {
        RunResponse {
            area: run.area(),
            row: run.row(),
            from_column: run.first_column(),
            to_column: run.last_column(),
            length: run.len(),
        }
    }
}

#[derive(Debug, Serialize)]
struct PartialRunResponse {
    #[serde(flatten)]
    run: RunResponse,
    used: usize,
}

#[derive(Debug, Serialize)]
struct AllocationResponse {
    allocation_id: Uuid,
    party_size: usize,
    strategy: Strategy,
    full_runs: Vec<RunResponse>,
    partial_run: Option<PartialRunResponse>,
    seats: Vec<String>,
}

impl AllocationResponse {
    fn new(party_size: usize, allocation: &Allocation, seats: &[SeatId]) -> Self {
        AllocationResponse {
            allocation_id: Uuid::new_v4(),
            party_size,
            strategy: allocation.strategy,
            full_runs: allocation.full.iter().map(RunResponse::from).collect(),
            partial_run: allocation.partial.as_ref().map(|p| PartialRunResponse {
                run: RunResponse::from(&p.run),
                used: p.used,
            }),
            seats: seats.iter().map(SeatId::to_string).collect(),
        }
    }
}

/// Checks the request and resolves the areas to search.
fn resolve_areas(
    state: &AppState,
    event: &Event,
    req: &AllocationRequest,
) -> Result<Vec<u16>, (StatusCode, String)> {
    req.validate()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let max = state.config.allocation.max_party_size;
    if req.party_size > max {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("party_size must not exceed {}", max),
        ));
    }

    match (req.level, &req.areas) {
        (Some(level), None) => {
            let areas = event.find_areas(level);
            if areas.is_empty() {
                return Err((StatusCode::BAD_REQUEST, format!("unknown level {}", level.0)));
            }
            Ok(areas.to_vec())
        }
        (None, Some(areas)) if !areas.is_empty() => Ok(areas.clone()),
        _ => Err((
            StatusCode::BAD_REQUEST,
            "exactly one of level or areas is required".to_string(),
        )),
    }
}

fn no_seats(party_size: usize) -> (StatusCode, String) {
    (
        StatusCode::CONFLICT,
        format!("no consecutive seats for a party of {}", party_size),
    )
}

/* ---------- ALLOCATIONS ---------- */

// POST /api/allocations/preview
async fn preview_allocation(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AllocationRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let event = state.venue.lock().await;
    let areas = resolve_areas(&state, &event, &req)?;

    let allocation = event
        .seats()
        .pick_best(req.party_size, &areas)
        .ok_or_else(|| no_seats(req.party_size))?;

    let response = AllocationResponse::new(req.party_size, &allocation, &allocation.seat_ids());
    Ok((StatusCode::OK, Json(response)))
}

// POST /api/allocations
async fn create_allocation(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AllocationRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut event = state.venue.lock().await;
    let areas = resolve_areas(&state, &event, &req)?;

    let allocation = event
        .seats()
        .pick_best(req.party_size, &areas)
        .ok_or_else(|| {
            tracing::info!(party_size = req.party_size, ?areas, "allocation rejected");
            no_seats(req.party_size)
        })?;

    let ordered = event.commit(&allocation).map_err(|e| {
        tracing::error!("commit failed for party of {}: {}", req.party_size, e);
        (StatusCode::INTERNAL_SERVER_ERROR, "failed to commit seats".to_string())
    })?;

    let ids: Vec<SeatId> = ordered.iter().map(|s| s.id()).collect();
    let response = AllocationResponse::new(req.party_size, &allocation, &ids);
    tracing::info!(
        allocation_id = %response.allocation_id,
        party_size = req.party_size,
        strategy = ?allocation.strategy,
        "seats allocated"
    );

    Ok((StatusCode::CREATED, Json(response)))
}
