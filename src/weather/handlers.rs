use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde_json::Value;
use tracing::instrument;

use crate::{error::ApiError, state::AppState};

pub fn forecast_routes() -> Router<AppState> {
    Router::new().route("/weather/:city", get(forecast))
}

/// GET /api/weather/:city — no auth. Relays the upstream forecast JSON
/// unmodified on success; upstream failures surface as a 502 envelope.
#[instrument(skip(state))]
pub async fn forecast(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let forecast = state.weather.forecast_by_city(&city).await?;
    Ok(Json(forecast))
}
