pub mod config;
pub mod controllers;
pub mod error;
pub mod models;
pub mod services;

use axum::{routing::get, Router};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

use crate::models::Event;

pub use error::SeatError;

// Shared state for the whole application.
// One lock over the venue: a pick and its commit never interleave with another.
pub struct AppState {
    pub config: config::Config,
    pub venue: Mutex<Event>,
}

impl AppState {
    pub fn new(config: config::Config, event: Event) -> Arc<Self> {
        Arc::new(Self {
            config,
            venue: Mutex::new(event),
        })
    }
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Seat allocator v1.0" }))
        .route("/health", get(|| async { "OK" }))
        .nest("/api", controllers::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
