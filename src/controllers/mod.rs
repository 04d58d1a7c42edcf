pub mod allocations;
pub mod venue;

use axum::Router;
use std::sync::Arc;

pub fn routes() -> Router<Arc<crate::AppState>> {
    Router::new()
        .merge(venue::routes())
        .merge(allocations::routes())
}
