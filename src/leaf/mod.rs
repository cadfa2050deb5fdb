use crate::state::AppState;
use axum::Router;

pub mod analyzer;
pub mod handlers;

pub fn router() -> Router<AppState> {
    handlers::analyze_routes()
}
