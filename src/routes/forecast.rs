use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::SymbolForecast;
use crate::services;
use crate::state::AppState;

/// Daily candles requested from the upstream for the analysis window.
const HISTORY_DAYS: u32 = 30;

pub fn router() -> Router<AppState> {
    Router::new().route("/:symbol", get(get_forecast))
}

pub async fn get_forecast(
    Path(symbol): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<SymbolForecast>, AppError> {
    info!("GET /forecast/{} - Building forecast", symbol);

    let candles = state
        .market
        .klines(&symbol, "1d", HISTORY_DAYS)
        .await
        .map_err(|e| {
            error!("Failed to fetch price history for {}: {}", symbol, e);
            AppError::External(e.to_string())
        })?;

    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();

    let result = services::forecast_service::forecast(&symbol, &closes, Utc::now().date_naive())
        .map_err(|e| {
            error!("Failed to build forecast for {}: {}", symbol, e);
            e
        })?;
    Ok(Json(result))
}
