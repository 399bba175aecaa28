use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::{OrderBook, SymbolQuote};
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:symbol", get(get_symbol_price))
        .route("/:symbol/depth", get(get_order_book))
}

pub async fn get_symbol_price(
    Path(symbol): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<SymbolQuote>, AppError> {
    info!("GET /price/{} - Fetching quote", symbol);
    let quote = services::quote_service::symbol_quote(state.market.as_ref(), &symbol)
        .await
        .map_err(|e| {
            error!("Failed to fetch quote for {}: {}", symbol, e);
            e
        })?;
    Ok(Json(quote))
}

#[derive(Debug, Deserialize)]
pub struct DepthParams {
    limit: Option<u32>,
}

pub async fn get_order_book(
    Path(symbol): Path<String>,
    Query(params): Query<DepthParams>,
    State(state): State<AppState>,
) -> Result<Json<OrderBook>, AppError> {
    let limit = params.limit.unwrap_or(100);
    info!("GET /price/{}/depth - Fetching order book (limit {})", symbol, limit);
    let book = services::quote_service::order_book(state.market.as_ref(), &symbol, limit)
        .await
        .map_err(|e| {
            error!("Failed to fetch order book for {}: {}", symbol, e);
            e
        })?;
    Ok(Json(book))
}

// Comparison logic itself is still a stub: the handler returns the full
// market snapshot for the client to diff against.
pub async fn compare_portfolio(
    Path(user_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    info!("GET /compare/{} - Fetching market snapshot", user_id);
    let market_data = services::quote_service::market_snapshot(state.market.as_ref())
        .await
        .map_err(|e| {
            error!("Failed to fetch market snapshot: {}", e);
            e
        })?;
    Ok(Json(json!({
        "user_id": user_id,
        "market_data": market_data
    })))
}
