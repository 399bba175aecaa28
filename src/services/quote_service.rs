use crate::errors::AppError;
use crate::external::market_data::MarketDataSource;
use crate::models::{OrderBook, SymbolQuote, TickerPrice};

/// Assemble the combined price + 24h view for one symbol.
///
/// The client zeroes unavailable quotes, so a zero price is the signal
/// that the upstream does not know the pairing.
pub async fn symbol_quote(
    market: &dyn MarketDataSource,
    symbol: &str,
) -> Result<SymbolQuote, AppError> {
    let ticker = market.current_price(symbol).await;
    if ticker.price == 0.0 {
        return Err(AppError::NotFound(format!(
            "no quote available for symbol {}",
            ticker.symbol
        )));
    }

    let stats = market.change_24h(symbol).await;
    Ok(SymbolQuote {
        symbol: ticker.symbol,
        price: ticker.price,
        change_24h: stats.price_change_percent,
        price_change: stats.price_change,
        last_price: stats.last_price,
    })
}

/// Current price for every instrument the upstream exposes.
pub async fn market_snapshot(market: &dyn MarketDataSource) -> Result<Vec<TickerPrice>, AppError> {
    market
        .all_prices()
        .await
        .map_err(|e| AppError::External(e.to_string()))
}

pub async fn order_book(
    market: &dyn MarketDataSource,
    symbol: &str,
    limit: u32,
) -> Result<OrderBook, AppError> {
    market
        .order_book(symbol, limit)
        .await
        .map_err(|e| AppError::External(e.to_string()))
}
