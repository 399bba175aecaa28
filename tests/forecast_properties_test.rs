/// Forecast arithmetic property tests.
///
/// Exercises the projection math used by the forecast endpoint: daily
/// percentage changes, population volatility, SMA trend comparison,
/// trailing-window RSI and the sqrt-scaled confidence bands.
///
/// NOTE: These tests validate the arithmetic contracts. End-to-end tests
/// against the live quote upstream require network access.

// ---------------------------------------------------------------------------
// Reference calculations
// ---------------------------------------------------------------------------

fn daily_changes(closes: &[f64]) -> Vec<f64> {
    closes
        .windows(2)
        .map(|w| (w[1] - w[0]) / w[0] * 100.0)
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divide by n, not n - 1).
fn population_std_dev(values: &[f64]) -> f64 {
    let avg = mean(values);
    (values.iter().map(|v| (v - avg) * (v - avg)).sum::<f64>() / values.len() as f64).sqrt()
}

/// Trailing-window RSI: 50.0 below period + 1 closes, 100.0 when the
/// window has no down-days.
fn trailing_rsi(closes: &[f64], period: usize) -> f64 {
    if closes.len() < period + 1 {
        return 50.0;
    }
    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();
    let tail = &deltas[deltas.len() - period..];
    let avg_gain = tail.iter().filter(|d| **d > 0.0).sum::<f64>() / period as f64;
    let avg_loss = tail.iter().filter(|d| **d < 0.0).map(|d| d.abs()).sum::<f64>() / period as f64;
    if avg_loss == 0.0 {
        return 100.0;
    }
    100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
}

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

/// The 15-point reference series used across the suite.
fn mixed_series() -> Vec<f64> {
    vec![
        100.0, 102.0, 101.0, 103.0, 105.0, 104.0, 106.0, 108.0, 107.0, 109.0, 110.0, 108.0,
        111.0, 112.0, 113.0,
    ]
}

// ---------------------------------------------------------------------------
// Daily changes and volatility
// ---------------------------------------------------------------------------

#[test]
fn test_constant_series_has_zero_change_and_volatility() {
    let closes = vec![500.0; 30];
    let changes = daily_changes(&closes);
    assert_eq!(changes.len(), 29);
    assert_eq!(mean(&changes), 0.0);
    assert_eq!(population_std_dev(&changes), 0.0);
    assert_eq!(confidence_level(population_std_dev(&changes)), "High");
}

#[test]
fn test_population_std_dev_divides_by_n() {
    // +10% then -10%: mean 0, population sigma exactly 10.
    let changes = daily_changes(&[100.0, 110.0, 99.0]);
    assert!((population_std_dev(&changes) - 10.0).abs() < 1e-9);
}

#[test]
fn test_confidence_thresholds() {
    assert_eq!(confidence_level(0.0), "High");
    assert_eq!(confidence_level(1.99), "High");
    assert_eq!(confidence_level(2.0), "Medium");
    assert_eq!(confidence_level(4.99), "Medium");
    assert_eq!(confidence_level(5.0), "Low");
}

// ---------------------------------------------------------------------------
// RSI
// ---------------------------------------------------------------------------

#[test]
fn test_rsi_defaults_to_neutral_below_15_points() {
    let closes: Vec<f64> = (0..14).map(|i| 100.0 + i as f64).collect();
    assert_eq!(trailing_rsi(&closes, 14), 50.0);
}

#[test]
fn test_rsi_is_100_with_no_down_days() {
    let closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
    assert_eq!(trailing_rsi(&closes, 14), 100.0);
}

#[test]
fn test_rsi_strictly_inside_bounds_for_mixed_series() {
    let rsi = trailing_rsi(&mixed_series(), 14);
    assert!(rsi > 0.0 && rsi < 100.0, "RSI {rsi} out of open interval");
    assert_ne!(rsi, 50.0, "15 points must not hit the neutral default");
}

#[test]
fn test_rsi_known_value_for_mixed_series() {
    // The 14 deltas hold 10 gains totalling 18 and 4 losses totalling 5.
    // RS = (18/14)/(5/14) = 3.6, RSI = 100 - 100/4.6 ≈ 78.26.
    let expected = 100.0 - 100.0 / (1.0 + 18.0 / 5.0);
    let rsi = trailing_rsi(&mixed_series(), 14);
    assert!((rsi - expected).abs() < 1e-9, "expected {expected}, got {rsi}");
}

// ---------------------------------------------------------------------------
// Forecast path and confidence bands
// ---------------------------------------------------------------------------

#[test]
fn test_confidence_interval_grows_with_sqrt_of_day() {
    let volatility = 3.0;
    let intervals: Vec<f64> = (0..7)
        .map(|day| volatility * ((day + 1) as f64).sqrt())
        .collect();

    for pair in intervals.windows(2) {
        assert!(pair[1] > pair[0], "interval must strictly increase");
    }
    assert!((intervals[0] - 3.0).abs() < 1e-9, "day one uses sqrt(1)");
    assert!((intervals[6] - 3.0 * 7.0_f64.sqrt()).abs() < 1e-9);
}

#[test]
fn test_compounded_path_from_last_close() {
    let closes = mixed_series();
    let changes = daily_changes(&closes);
    let avg = mean(&changes);
    let sma7 = mean(&closes[8..]);
    let sma14 = mean(&closes[1..]);
    let trend_factor = 1.0 + (sma7 / sma14 - 1.0);
    let predicted = avg * trend_factor;

    let mut price = *closes.last().unwrap();
    let mut previous = price;
    for _ in 0..7 {
        price *= 1.0 + predicted / 100.0;
        // Rising series: the projection keeps compounding upward.
        assert!(price > previous);
        previous = price;
    }
}

// ---------------------------------------------------------------------------
// Price range
// ---------------------------------------------------------------------------

#[test]
fn test_price_range_for_mixed_series() {
    // Max 113, min 100 -> 13%.
    assert!((price_range_percent(&mixed_series()) - 13.0).abs() < 1e-9);
}

#[test]
fn test_price_range_invariant_under_uniform_scaling() {
    let base = mixed_series();
    let scaled: Vec<f64> = base.iter().map(|c| c * 42.0).collect();
    assert!((price_range_percent(&base) - price_range_percent(&scaled)).abs() < 1e-9);
}
