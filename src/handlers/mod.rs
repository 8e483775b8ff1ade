pub mod api;
pub mod health;
pub mod staff;

pub use api::{create_api_router, ApiState};
pub use health::health_check;
pub use staff::{create_staff_router, StaffState};

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Assemble the full application router
pub fn create_app(api_state: ApiState, staff_state: StaffState) -> Router {
    Router::new()
        .route("/health/status", get(health_check))
        .merge(create_api_router(api_state))
        .merge(create_staff_router(staff_state))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
