//! Average True Range (ATR).
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|)
//! Seed: mean of TR[1..=period] at index `period`, then Wilder smoothing.
//! Fewer than period+1 bars → 0, and warmup positions hold 0.

use super::Indicator;
use crate::domain::CandleSeries;
use crate::error::{check_period, IndicatorError};
use crate::series::{mean, wilder_smooth};

#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    name: String,
}

impl Atr {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        check_period("atr", period)?;
        Ok(Self {
            period,
            name: format!("atr_{period}"),
        })
    }
}

/// True Range series. TR[0] = high[0] - low[0] (no previous close).
pub fn true_range(series: &CandleSeries) -> Vec<f64> {
    let (high, low, close) = (series.high(), series.low(), series.close());
    let n = series.len();
    let mut tr = vec![0.0; n];
    if n == 0 {
        return tr;
    }

    tr[0] = high[0] - low[0];
    for i in 1..n {
        let pc = close[i - 1];
        tr[i] = (high[i] - low[i])
            .max((high[i] - pc).abs())
            .max((low[i] - pc).abs());
    }
    tr
}

/// Wilder-smoothed series over `values[1..]`, seeded with the mean of
/// `values[1..=period]` at index `period`. Earlier positions are 0.
///
/// Index 0 is skipped because TR and directional movement are undefined for
/// the first bar. `period` must be >= 1.
pub(crate) fn wilder_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![0.0; n];
    if n < period + 1 {
        return result;
    }

    let mut prev = mean(&values[1..=period]);
    result[period] = prev;
    for i in (period + 1)..n {
        prev = wilder_smooth(prev, values[i], period);
        result[i] = prev;
    }
    result
}

impl Indicator for Atr {
    type Output = Vec<f64>;

    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, series: &CandleSeries) -> Vec<f64> {
        wilder_series(&true_range(series), self.period)
    }
}
