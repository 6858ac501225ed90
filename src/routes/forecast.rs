//! Weather forecast handler.

use axum::{extract::State, Extension, Json};
use tracing::instrument;

use crate::forecast::ForecastRecord;
use crate::middleware::RequestId;
use crate::state::AppState;

/// `GET /weatherforecast`: a freshly generated forecast, one record per day.
#[instrument(name = "forecast::weather_forecast", skip(state, request_id))]
pub async fn weather_forecast(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> Json<Vec<ForecastRecord>> {
    let records = state.forecast.generate_now();
    tracing::debug!(
        request_id = %request_id.0,
        count = records.len(),
        environment = %state.environment,
        "Generated forecast"
    );
    Json(records)
}
