use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{HoldingEntry, PortfolioView, SavePortfolioRequest, SaveReceipt};
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/manual", post(add_manual_entry))
        .route("/save", post(save_portfolio))
        .route("/address/:wallet", get(sync_wallet))
        .route("/:user_id", get(get_portfolio))
}

/// Echo a manually entered position back with its live quote. Nothing is
/// persisted here; the client batches entries into `/portfolio/save`.
pub async fn add_manual_entry(
    State(state): State<AppState>,
    Json(entry): Json<HoldingEntry>,
) -> Result<Json<Value>, AppError> {
    info!("POST /portfolio/manual - Pricing entry for {}", entry.symbol);

    let ticker = state.market.current_price(&entry.symbol).await;
    if ticker.price == 0.0 {
        error!("No quote available for manual entry {}", entry.symbol);
        return Err(AppError::Validation(format!(
            "no quote available for symbol {}",
            entry.symbol
        )));
    }

    Ok(Json(json!({
        "message": "Coin added successfully",
        "coin": entry,
        "current_price": ticker
    })))
}

pub async fn save_portfolio(
    State(state): State<AppState>,
    Json(req): Json<SavePortfolioRequest>,
) -> Result<Json<SaveReceipt>, AppError> {
    info!(
        "POST /portfolio/save - Replacing holdings for {} ({} entries)",
        req.email,
        req.holdings.len()
    );
    let receipt = services::portfolio_service::save(&state.pool, req)
        .await
        .map_err(|e| {
            error!("Failed to save portfolio: {}", e);
            e
        })?;
    Ok(Json(receipt))
}

pub async fn get_portfolio(
    Path(user_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<PortfolioView>, AppError> {
    info!("GET /portfolio/{} - Fetching enriched holdings", user_id);
    let view =
        services::portfolio_service::holdings_view(&state.pool, state.market.as_ref(), user_id)
            .await
            .map_err(|e| {
                error!("Failed to fetch portfolio for {}: {}", user_id, e);
                e
            })?;
    Ok(Json(view))
}

// Wallet synchronization never left the stub stage upstream; the handler
// acknowledges the address and returns no holdings.
pub async fn sync_wallet(Path(wallet): Path<String>) -> Json<Value> {
    info!("GET /portfolio/address/{} - Wallet sync stub", wallet);
    Json(json!({
        "message": format!("Wallet {} synchronized", wallet),
        "holdings": []
    }))
}
