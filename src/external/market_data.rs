use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Candle, OrderBook, Ticker24h, TickerPrice};

#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Upstream quote source. Implementations hold no per-call state; a shared
/// connection pool inside the HTTP client is the only thing reused.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Latest trade price for `symbol` against the USDT pairing.
    ///
    /// Never fails: transport errors, non-success statuses and missing
    /// fields all collapse to `price = 0.0`. Callers must treat zero as
    /// "unavailable", not as a real quote.
    async fn current_price(&self, symbol: &str) -> TickerPrice;

    /// 24-hour statistics for `symbol`. Same fetch-or-zero contract as
    /// [`current_price`](Self::current_price); the three numeric fields
    /// are zeroed together on failure.
    async fn change_24h(&self, symbol: &str) -> Ticker24h;

    /// Historical candles, oldest first. Errors are NOT normalized here;
    /// callers must handle failures and short series explicitly.
    async fn klines(
        &self,
        symbol: &str,
        interval: &str,
        limit: u32,
    ) -> Result<Vec<Candle>, MarketDataError>;

    /// Current price for every instrument the upstream exposes.
    async fn all_prices(&self) -> Result<Vec<TickerPrice>, MarketDataError>;

    /// Order book depth for `symbol`.
    async fn order_book(&self, symbol: &str, limit: u32) -> Result<OrderBook, MarketDataError>;
}
