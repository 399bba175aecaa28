use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Latest trade price for one instrument, quoted against USDT.
/// A `price` of 0.0 means the quote was unavailable, not that the
/// instrument trades at zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerPrice {
    pub symbol: String,
    pub price: f64,
}

/// 24-hour rolling statistics for one instrument. All numeric fields are
/// zeroed together when the upstream fetch fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticker24h {
    pub symbol: String,
    pub price_change_percent: f64,
    pub price_change: f64,
    pub last_price: f64,
}

/// One daily OHLCV bucket from the upstream kline endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open_time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub close_time: i64,
}

/// A single price level in the order book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBookLevel {
    pub price: f64,
    pub quantity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderBook {
    pub symbol: String,
    pub bids: Vec<OrderBookLevel>,
    pub asks: Vec<OrderBookLevel>,
}

/// Combined price + 24h view returned by `GET /price/{symbol}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolQuote {
    pub symbol: String,
    pub price: f64,
    pub change_24h: f64,
    pub price_change: f64,
    pub last_price: f64,
}

/// Per-symbol entry inside a streamed snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotQuote {
    pub price: f64,
    pub change_24h: f64,
    pub price_change: f64,
    pub last_price: f64,
}

/// One broadcast tick: every tracked symbol that had a live quote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub timestamp: String,
    pub prices: BTreeMap<String, SnapshotQuote>,
}
