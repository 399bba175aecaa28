use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::external::market_data::{MarketDataError, MarketDataSource};
use crate::models::{Candle, OrderBook, OrderBookLevel, Ticker24h, TickerPrice};

const BASE_URL: &str = "https://api.binance.com/api/v3";

/// Fixed quote-currency suffix appended to every base symbol.
const QUOTE_SUFFIX: &str = "USDT";

/// Index of the close price inside a raw kline row.
const KLINE_CLOSE_IDX: usize = 4;

pub struct BinanceMarketData {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct PriceTickerRaw {
    symbol: String,
    price: String,
}

#[derive(Debug, Deserialize)]
struct Ticker24hRaw {
    #[serde(rename = "priceChangePercent")]
    price_change_percent: String,
    #[serde(rename = "priceChange")]
    price_change: String,
    #[serde(rename = "lastPrice")]
    last_price: String,
}

#[derive(Debug, Deserialize)]
struct DepthRaw {
    bids: Vec<(String, String)>,
    asks: Vec<(String, String)>,
}

impl BinanceMarketData {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("failed to build reqwest client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn pair(symbol: &str) -> String {
        format!("{}{}", symbol.to_uppercase(), QUOTE_SUFFIX)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, MarketDataError> {
        let resp = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .query(query)
            .send()
            .await
            .map_err(|e| MarketDataError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(MarketDataError::BadResponse(format!(
                "upstream returned {}",
                status
            )));
        }

        resp.json()
            .await
            .map_err(|e| MarketDataError::Parse(e.to_string()))
    }

    async fn try_current_price(&self, symbol: &str) -> Result<TickerPrice, MarketDataError> {
        let raw: PriceTickerRaw = self
            .get_json("/ticker/price", &[("symbol", Self::pair(symbol))])
            .await?;

        Ok(TickerPrice {
            symbol: symbol.to_uppercase(),
            price: parse_decimal(&raw.price, "price")?,
        })
    }

    async fn try_change_24h(&self, symbol: &str) -> Result<Ticker24h, MarketDataError> {
        let raw: Ticker24hRaw = self
            .get_json("/ticker/24hr", &[("symbol", Self::pair(symbol))])
            .await?;

        Ok(Ticker24h {
            symbol: symbol.to_uppercase(),
            price_change_percent: parse_decimal(&raw.price_change_percent, "priceChangePercent")?,
            price_change: parse_decimal(&raw.price_change, "priceChange")?,
            last_price: parse_decimal(&raw.last_price, "lastPrice")?,
        })
    }
}

impl Default for BinanceMarketData {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketDataSource for BinanceMarketData {
    async fn current_price(&self, symbol: &str) -> TickerPrice {
        match self.try_current_price(symbol).await {
            Ok(ticker) => ticker,
            Err(e) => {
                debug!("price fetch for {} failed, zeroing: {}", symbol, e);
                TickerPrice {
                    symbol: symbol.to_uppercase(),
                    price: 0.0,
                }
            }
        }
    }

    async fn change_24h(&self, symbol: &str) -> Ticker24h {
        match self.try_change_24h(symbol).await {
            Ok(stats) => stats,
            Err(e) => {
                debug!("24h stats fetch for {} failed, zeroing: {}", symbol, e);
                Ticker24h {
                    symbol: symbol.to_uppercase(),
                    price_change_percent: 0.0,
                    price_change: 0.0,
                    last_price: 0.0,
                }
            }
        }
    }

    async fn klines(
        &self,
        symbol: &str,
        interval: &str,
        limit: u32,
    ) -> Result<Vec<Candle>, MarketDataError> {
        let rows: Vec<Vec<Value>> = self
            .get_json(
                "/klines",
                &[
                    ("symbol", Self::pair(symbol)),
                    ("interval", interval.to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;

        rows.iter().map(|row| candle_from_row(row)).collect()
    }

    async fn all_prices(&self) -> Result<Vec<TickerPrice>, MarketDataError> {
        let raw: Vec<PriceTickerRaw> = self.get_json("/ticker/price", &[]).await?;

        raw.into_iter()
            .map(|t| {
                let price = parse_decimal(&t.price, "price")?;
                Ok(TickerPrice {
                    symbol: t.symbol,
                    price,
                })
            })
            .collect()
    }

    async fn order_book(&self, symbol: &str, limit: u32) -> Result<OrderBook, MarketDataError> {
        let raw: DepthRaw = self
            .get_json(
                "/depth",
                &[
                    ("symbol", Self::pair(symbol)),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;

        Ok(OrderBook {
            symbol: symbol.to_uppercase(),
            bids: parse_levels(raw.bids)?,
            asks: parse_levels(raw.asks)?,
        })
    }
}

fn parse_decimal(value: &str, field: &str) -> Result<f64, MarketDataError> {
    value
        .parse::<f64>()
        .map_err(|_| MarketDataError::Parse(format!("field {} is not a number: {:?}", field, value)))
}

fn parse_levels(levels: Vec<(String, String)>) -> Result<Vec<OrderBookLevel>, MarketDataError> {
    levels
        .into_iter()
        .map(|(price, quantity)| {
            Ok(OrderBookLevel {
                price: parse_decimal(&price, "level price")?,
                quantity: parse_decimal(&quantity, "level quantity")?,
            })
        })
        .collect()
}

/// A raw kline row is a mixed-type JSON array:
/// `[open_time, open, high, low, close, volume, close_time, ...]`
/// with the prices and volume as strings. The close sits at index 4.
fn candle_from_row(row: &[Value]) -> Result<Candle, MarketDataError> {
    if row.len() <= KLINE_CLOSE_IDX + 2 {
        return Err(MarketDataError::Parse(format!(
            "kline row has {} fields, expected at least {}",
            row.len(),
            KLINE_CLOSE_IDX + 3
        )));
    }

    let int_at = |idx: usize, name: &str| -> Result<i64, MarketDataError> {
        row[idx]
            .as_i64()
            .ok_or_else(|| MarketDataError::Parse(format!("kline field {} is not an integer", name)))
    };
    let decimal_at = |idx: usize, name: &str| -> Result<f64, MarketDataError> {
        row[idx]
            .as_str()
            .ok_or_else(|| MarketDataError::Parse(format!("kline field {} is not a string", name)))
            .and_then(|s| parse_decimal(s, name))
    };

    Ok(Candle {
        open_time: int_at(0, "open_time")?,
        open: decimal_at(1, "open")?,
        high: decimal_at(2, "high")?,
        low: decimal_at(3, "low")?,
        close: decimal_at(KLINE_CLOSE_IDX, "close")?,
        volume: decimal_at(5, "volume")?,
        close_time: int_at(6, "close_time")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_row() -> Vec<Value> {
        json!([
            1700000000000_i64,
            "42000.10",
            "43250.00",
            "41800.55",
            "43100.99",
            "1523.4",
            1700086399999_i64,
            "65402123.1",
            120345,
            "800.2",
            "34400123.9",
            "0"
        ])
        .as_array()
        .cloned()
        .unwrap()
    }

    #[test]
    fn candle_parses_close_from_index_4() {
        let candle = candle_from_row(&sample_row()).unwrap();
        assert_eq!(candle.close, 43100.99);
        assert_eq!(candle.open, 42000.10);
        assert_eq!(candle.open_time, 1700000000000);
        assert_eq!(candle.close_time, 1700086399999);
    }

    #[test]
    fn candle_rejects_short_row() {
        let row = json!([1700000000000_i64, "1", "2", "3"])
            .as_array()
            .cloned()
            .unwrap();
        assert!(candle_from_row(&row).is_err());
    }

    #[test]
    fn candle_rejects_numeric_close() {
        let mut row = sample_row();
        row[KLINE_CLOSE_IDX] = json!(43100.99);
        assert!(candle_from_row(&row).is_err());
    }

    #[test]
    fn pair_appends_quote_suffix() {
        assert_eq!(BinanceMarketData::pair("btc"), "BTCUSDT");
        assert_eq!(BinanceMarketData::pair("ETH"), "ETHUSDT");
    }

    #[test]
    fn depth_levels_parse() {
        let levels = vec![
            ("42000.5".to_string(), "0.25".to_string()),
            ("41999.0".to_string(), "1.5".to_string()),
        ];
        let parsed = parse_levels(levels).unwrap();
        assert_eq!(parsed[0].price, 42000.5);
        assert_eq!(parsed[1].quantity, 1.5);
    }

    #[tokio::test]
    async fn unreachable_upstream_zeroes_the_quote() {
        // Nothing listens on the discard port; the fetch must fail fast
        // and collapse to the zero sentinel instead of erroring.
        let source = BinanceMarketData::with_base_url("http://127.0.0.1:9/api/v3");

        let price = source.current_price("BTC").await;
        assert_eq!(price.symbol, "BTC");
        assert_eq!(price.price, 0.0);

        let stats = source.change_24h("BTC").await;
        assert_eq!(stats.price_change_percent, 0.0);
        assert_eq!(stats.price_change, 0.0);
        assert_eq!(stats.last_price, 0.0);

        // Candles do not normalize; the error must surface.
        assert!(source.klines("BTC", "1d", 30).await.is_err());
    }
}
