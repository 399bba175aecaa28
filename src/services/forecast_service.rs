use chrono::{Duration, NaiveDate};

use crate::errors::AppError;
use crate::models::{AnalysisSummary, ForecastPoint, SymbolForecast};

/// Days projected forward from the last known close.
pub const FORECAST_HORIZON_DAYS: usize = 7;

/// Trailing window for the momentum oscillator.
const RSI_PERIOD: usize = 14;

const SHORT_SMA_WINDOW: usize = 7;
const LONG_SMA_WINDOW: usize = 14;

/// Project a 7-day price path with confidence bands from a series of daily
/// closes (chronological, oldest first).
///
/// The projection compounds the average daily change, scaled by the
/// short-vs-long SMA trend, from the last close. Confidence bands widen
/// with the square root of the forecast day count, scaled by the
/// population standard deviation of the daily changes.
///
/// `anchor` labels the projected dates: the first point lands one day
/// after it.
///
/// The series must hold at least 14 positive closes; shorter or
/// non-positive input is rejected rather than allowed to degenerate into
/// NaN statistics. RSI additionally needs 15 closes and reports a neutral
/// 50.0 below that.
pub fn forecast(
    symbol: &str,
    closes: &[f64],
    anchor: NaiveDate,
) -> Result<SymbolForecast, AppError> {
    if closes.len() < LONG_SMA_WINDOW {
        return Err(AppError::Validation(format!(
            "forecast for {} needs at least {} daily closes, got {}",
            symbol,
            LONG_SMA_WINDOW,
            closes.len()
        )));
    }
    if closes.iter().any(|c| !c.is_finite() || *c <= 0.0) {
        return Err(AppError::Validation(format!(
            "price history for {} contains a non-positive close",
            symbol
        )));
    }

    let changes = daily_changes(closes);
    let avg_daily_change = mean(&changes);
    let volatility = population_std_dev(&changes, avg_daily_change);

    let sma_short = trailing_mean(closes, SHORT_SMA_WINDOW);
    let sma_long = trailing_mean(closes, LONG_SMA_WINDOW);
    let trend_strength = (sma_short / sma_long - 1.0) * 100.0;

    let rsi = relative_strength_index(closes, RSI_PERIOD);

    let last_close = closes[closes.len() - 1];
    let trend_factor = 1.0 + trend_strength / 100.0;
    let predicted_change = avg_daily_change * trend_factor;

    let mut current = last_close;
    let mut points = Vec::with_capacity(FORECAST_HORIZON_DAYS);
    for day in 0..FORECAST_HORIZON_DAYS {
        // 1-indexed day count inside the square root: the first projected
        // day already carries one full unit of volatility.
        let confidence_interval = volatility * ((day + 1) as f64).sqrt();
        current *= 1.0 + predicted_change / 100.0;
        points.push(ForecastPoint {
            date: anchor + Duration::days(day as i64 + 1),
            price: round2(current),
            upper_bound: round2(current * (1.0 + confidence_interval / 100.0)),
            lower_bound: round2(current * (1.0 - confidence_interval / 100.0)),
        });
    }

    Ok(SymbolForecast {
        symbol: symbol.to_uppercase(),
        current_price: last_close,
        forecast: points,
        analysis: AnalysisSummary {
            volatility: round2(volatility),
            trend_strength: round2(trend_strength),
            rsi: round2(rsi),
            price_range_30d: round2(price_range_percent(closes)),
            avg_daily_change: round2(avg_daily_change),
            // Thresholds apply to the un-rounded figure.
            confidence_level: confidence_level(volatility).to_string(),
        },
    })
}

/// Percentage change between each pair of adjacent closes.
fn daily_changes(closes: &[f64]) -> Vec<f64> {
    closes
        .windows(2)
        .map(|w| (w[1] - w[0]) / w[0] * 100.0)
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation: squared deviations averaged over n,
/// not n - 1.
fn population_std_dev(values: &[f64], mean: f64) -> f64 {
    let variance = values
        .iter()
        .map(|v| {
            let d = v - mean;
            d * d
        })
        .sum::<f64>()
        / values.len() as f64;
    variance.sqrt()
}

/// Mean of the last `window` closes. Callers guarantee enough points.
fn trailing_mean(closes: &[f64], window: usize) -> f64 {
    mean(&closes[closes.len() - window..])
}

/// Relative Strength Index over the trailing `period` deltas.
///
/// Below `period + 1` closes there are not enough deltas, and the neutral
/// default 50.0 is returned without computing anything. A window with no
/// down-days has zero average loss and pins the index at exactly 100.0.
fn relative_strength_index(closes: &[f64], period: usize) -> f64 {
    if closes.len() < period + 1 {
        return 50.0;
    }

    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();
    let tail = &deltas[deltas.len() - period..];

    let avg_gain = tail.iter().filter(|d| **d > 0.0).sum::<f64>() / period as f64;
    let avg_loss = tail
        .iter()
        .filter(|d| **d < 0.0)
        .map(|d| d.abs())
        .sum::<f64>()
        / period as f64;

    if avg_loss == 0.0 {
        return 100.0;
    }

    100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
}

/// Spread between the highest and lowest close, as a percentage of the
/// lowest. Invariant under uniform scaling of the series.
fn price_range_percent(closes: &[f64]) -> f64 {
    let max = closes.iter().cloned().fold(f64::MIN, f64::max);
    let min = closes.iter().cloned().fold(f64::MAX, f64::min);
    (max - min) / min * 100.0
}

fn confidence_level(volatility: f64) -> &'static str {
    if volatility < 2.0 {
        "High"
    } else if volatility < 5.0 {
        "Medium"
    } else {
        "Low"
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn anchor() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    /// The 15-point reference series: mostly rising with a few down-days.
    fn mixed_series() -> Vec<f64> {
        vec![
            100.0, 102.0, 101.0, 103.0, 105.0, 104.0, 106.0, 108.0, 107.0, 109.0, 110.0, 108.0,
            111.0, 112.0, 113.0,
        ]
    }

    #[test]
    fn constant_series_is_flat_and_high_confidence() {
        let closes = vec![250.0; 20];
        let result = forecast("BTC", &closes, anchor()).unwrap();

        assert_eq!(result.analysis.avg_daily_change, 0.0);
        assert_eq!(result.analysis.volatility, 0.0);
        assert_eq!(result.analysis.trend_strength, 0.0);
        assert_eq!(result.analysis.confidence_level, "High");
        assert_eq!(result.current_price, 250.0);

        for point in &result.forecast {
            assert_eq!(point.price, 250.0);
            assert_eq!(point.upper_bound, 250.0);
            assert_eq!(point.lower_bound, 250.0);
        }
    }

    #[test]
    fn short_series_reports_neutral_rsi() {
        // 14 closes clear the SMA requirement but leave only 13 deltas.
        let closes: Vec<f64> = (0..14).map(|i| 100.0 + (i % 3) as f64).collect();
        let result = forecast("ETH", &closes, anchor()).unwrap();
        assert_eq!(result.analysis.rsi, 50.0);
    }

    #[test]
    fn monotonic_rise_pins_rsi_at_100() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let result = forecast("SOL", &closes, anchor()).unwrap();
        assert_eq!(result.analysis.rsi, 100.0);
    }

    #[test]
    fn confidence_band_widens_every_day() {
        let result = forecast("BTC", &mixed_series(), anchor()).unwrap();
        let widths: Vec<f64> = result
            .forecast
            .iter()
            .map(|p| p.upper_bound - p.lower_bound)
            .collect();
        for pair in widths.windows(2) {
            assert!(
                pair[1] > pair[0],
                "band width must grow: {} then {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn price_range_is_scale_invariant() {
        let base = mixed_series();
        let scaled: Vec<f64> = base.iter().map(|c| c * 7.5).collect();

        let a = forecast("BTC", &base, anchor()).unwrap();
        let b = forecast("BTC", &scaled, anchor()).unwrap();
        assert!((a.analysis.price_range_30d - b.analysis.price_range_30d).abs() < 1e-9);
    }

    #[test]
    fn mixed_series_end_to_end() {
        let result = forecast("btc", &mixed_series(), anchor()).unwrap();

        assert_eq!(result.symbol, "BTC");
        assert_eq!(result.current_price, 113.0);
        assert_eq!(result.forecast.len(), FORECAST_HORIZON_DAYS);

        // 15 points: enough deltas for a real RSI, strictly inside (0, 100).
        assert!(result.analysis.rsi > 0.0 && result.analysis.rsi < 100.0);
        assert_ne!(result.analysis.rsi, 50.0);

        // Dates run consecutively starting tomorrow.
        let mut expected = anchor();
        for point in &result.forecast {
            expected += Duration::days(1);
            assert_eq!(point.date, expected);
        }

        // Rising series with modest swings: positive drift, upward trend.
        assert!(result.analysis.avg_daily_change > 0.0);
        assert!(result.analysis.trend_strength > 0.0);
        assert!(result.forecast[6].price > result.forecast[0].price);
    }

    #[test]
    fn too_few_closes_are_rejected() {
        let closes = vec![100.0; 13];
        let err = forecast("BTC", &closes, anchor()).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn non_positive_close_is_rejected() {
        let mut closes = mixed_series();
        closes[4] = 0.0;
        let err = forecast("BTC", &closes, anchor()).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn volatility_is_population_std_dev() {
        // Changes of +10% and -10%: mean 0, population std dev exactly 10.
        // The sample estimator would give sqrt(200/1) ≈ 14.14 instead.
        let changes = daily_changes(&[100.0, 110.0, 99.0]);
        let avg = mean(&changes);
        assert!(avg.abs() < 1e-9);
        assert!((population_std_dev(&changes, avg) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn trend_strength_compares_sma7_to_sma14() {
        let result = forecast("BTC", &mixed_series(), anchor()).unwrap();

        let closes = mixed_series();
        let sma7: f64 = closes[8..].iter().sum::<f64>() / 7.0;
        let sma14: f64 = closes[1..].iter().sum::<f64>() / 14.0;
        let expected = round2((sma7 / sma14 - 1.0) * 100.0);
        assert_eq!(result.analysis.trend_strength, expected);
    }
}
