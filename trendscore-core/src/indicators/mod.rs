//! Concrete indicator implementations.
//!
//! Every indicator is a small parameter struct implementing [`Indicator`].
//! Constructors validate periods and multipliers; `compute` is infallible
//! and returns series aligned with the input candles. Positions inside the
//! warmup window hold the indicator's documented fallback value instead of
//! NaN, so every output is finite.
//!
//! Multi-series indicators (MACD, ADX, Bollinger, Stochastic RSI,
//! Supertrend, volume) return a dedicated output struct.

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod stoch_rsi;
pub mod supertrend;
pub mod volume;

pub use adx::{Adx, AdxOutput};
pub use atr::Atr;
pub use bollinger::{Bollinger, BollingerOutput};
pub use ema::Ema;
pub use macd::{Macd, MacdOutput};
pub use rsi::Rsi;
pub use stoch_rsi::{StochRsi, StochRsiOutput};
pub use supertrend::{Supertrend, SupertrendOutput, Trend};
pub use volume::{VolumeOutput, VolumeRatio};

use crate::domain::CandleSeries;

/// Trait for indicators.
///
/// Indicators take a full candle series and produce output of the same
/// length. No value at bar `t` may depend on data from bar `t+1` or later.
pub trait Indicator: Send + Sync {
    type Output;

    /// Human-readable name (e.g., "rsi_14", "atr_3").
    fn name(&self) -> &str;

    /// Number of bars needed before output leaves the short-history fallback.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire series.
    fn compute(&self, series: &CandleSeries) -> Self::Output;
}

/// Last element of a non-empty indicator series.
pub(crate) fn last(values: &[f64]) -> f64 {
    values.last().copied().unwrap_or(0.0)
}

/// Create synthetic candles from close prices for testing.
///
/// Generates plausible OHLCV: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_candles(closes: &[f64]) -> Vec<crate::domain::Candle> {
    let data: Vec<(f64, f64, f64, f64)> = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            (open, open.max(close) + 1.0, open.min(close) - 1.0, close)
        })
        .collect();
    make_ohlc_candles(&data)
}

/// Candles from explicit (open, high, low, close) tuples, volume = 1000.
#[cfg(test)]
pub fn make_ohlc_candles(data: &[(f64, f64, f64, f64)]) -> Vec<crate::domain::Candle> {
    use chrono::TimeZone;
    let base = chrono::Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    data.iter()
        .enumerate()
        .map(|(i, &(open, high, low, close))| crate::domain::Candle {
            timestamp: base + chrono::Duration::minutes(15 * i as i64),
            open,
            high,
            low,
            close,
            volume: 1000.0,
        })
        .collect()
}

/// Validated series from close prices for testing.
#[cfg(test)]
pub fn series_from_closes(closes: &[f64]) -> CandleSeries {
    CandleSeries::from_candles(&make_candles(closes)).unwrap()
}

/// Validated series from (open, high, low, close) tuples for testing.
#[cfg(test)]
pub fn series_from_ohlc(data: &[(f64, f64, f64, f64)]) -> CandleSeries {
    CandleSeries::from_candles(&make_ohlc_candles(data)).unwrap()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
