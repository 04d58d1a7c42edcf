use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;

use crate::models::{Level, SeatSummary};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/levels", get(get_levels))
        .route("/summary", get(get_summary))
}

#[derive(Debug, Serialize)]
pub struct LevelResponse {
    pub level: Level,
    pub name: String,
    pub areas: Vec<u16>,
    pub available: usize,
}

// GET /api/levels
async fn get_levels(State(state): State<Arc<AppState>>) -> Json<Vec<LevelResponse>> {
    let event = state.venue.lock().await;
    let counts = event.level_counts();

    let levels = event
        .levels()
        .map(|(level, name)| LevelResponse {
            level,
            name: name.to_string(),
            areas: event.find_areas(level).to_vec(),
            available: counts.get(&level).copied().unwrap_or_default(),
        })
        .collect();

    Json(levels)
}

// GET /api/summary
async fn get_summary(State(state): State<Arc<AppState>>) -> Json<SeatSummary> {
    let event = state.venue.lock().await;
    Json(event.seats().summary())
}
