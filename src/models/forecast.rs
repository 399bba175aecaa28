use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One projected day of the forward price path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub price: f64,
    pub upper_bound: f64,
    pub lower_bound: f64,
}

/// Derived statistics over the input window. All numeric fields are
/// rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub volatility: f64,
    pub trend_strength: f64,
    pub rsi: f64,
    pub price_range_30d: f64,
    pub avg_daily_change: f64,
    pub confidence_level: String,
}

/// Full response of `GET /forecast/{symbol}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolForecast {
    pub symbol: String,
    pub current_price: f64,
    pub forecast: Vec<ForecastPoint>,
    pub analysis: AnalysisSummary,
}
