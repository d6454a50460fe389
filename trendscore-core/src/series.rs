//! Numeric recurrence primitives shared by every indicator.
//!
//! - SMA: mean of the trailing `period` values.
//! - EMA: seeded with the SMA of the first `period` values, then
//!   `ema[i] = (v[i] - ema[i-1]) * 2/(period+1) + ema[i-1]`.
//! - Wilder smoothing: `(prev * (period-1) + new) / period`, used by RSI,
//!   ATR and ADX.
//!
//! Short input is not an error: SMA/EMA fall back to the last value and the
//! EMA series falls back to the input itself.

use crate::error::{check_period, IndicatorError};

/// Mean of the last `period` values, or the last value when fewer exist.
pub fn sma(values: &[f64], period: usize) -> Result<f64, IndicatorError> {
    check_period("sma", period)?;
    let last = *values.last().ok_or(IndicatorError::EmptySeries)?;
    if values.len() < period {
        return Ok(last);
    }
    Ok(mean(&values[values.len() - period..]))
}

/// Latest EMA value, or the last input value when `values.len() < period`.
pub fn ema(values: &[f64], period: usize) -> Result<f64, IndicatorError> {
    let series = ema_series(values, period)?;
    // ema_series never returns an empty vec for non-empty input
    series.last().copied().ok_or(IndicatorError::EmptySeries)
}

/// Full EMA series aligned with the input.
///
/// Indices before `period - 1` carry the raw input value, index `period - 1`
/// holds the SMA seed. When `values.len() < period` the input is returned
/// unchanged.
pub fn ema_series(values: &[f64], period: usize) -> Result<Vec<f64>, IndicatorError> {
    check_period("ema", period)?;
    if values.is_empty() {
        return Err(IndicatorError::EmptySeries);
    }
    Ok(ema_series_unchecked(values, period))
}

/// One Wilder smoothing step. `period` must be >= 1.
pub fn wilder_smooth(prev: f64, value: f64, period: usize) -> f64 {
    debug_assert!(period >= 1, "wilder period must be >= 1");
    let n = period as f64;
    (prev * (n - 1.0) + value) / n
}

pub(crate) fn ema_series_unchecked(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    if n < period {
        return values.to_vec();
    }

    let alpha = 2.0 / (period as f64 + 1.0);
    let mut result = values.to_vec();

    let seed = mean(&values[..period]);
    result[period - 1] = seed;

    let mut prev = seed;
    for i in period..n {
        let ema = (values[i] - prev) * alpha + prev;
        result[i] = ema;
        prev = ema;
    }

    result
}

/// Per-index SMA over the trailing window, with the same short-window
/// fallback as [`sma`]: positions with fewer than `period` values carry
/// their own value.
pub(crate) fn rolling_sma(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = values.to_vec();
    if n < period {
        return result;
    }

    for i in (period - 1)..n {
        result[i] = mean(&values[i + 1 - period..=i]);
    }
    result
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation around a precomputed mean.
pub(crate) fn population_stddev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance = values
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / values.len() as f64;
    variance.sqrt()
}
