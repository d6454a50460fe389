//! Relative Strength Index (RSI).
//!
//! Seed: simple mean of gains and losses over the first `period` deltas.
//! Then Wilder smoothing: avg = (avg * (period-1) + new) / period.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss); avg_loss == 0 → 100.
//! Lookback: period. Fewer than period+1 closes → 50 everywhere, and the
//! warmup positions before index `period` also hold 50.

use super::Indicator;
use crate::domain::CandleSeries;
use crate::error::{check_period, IndicatorError};
use crate::series::wilder_smooth;

/// Neutral RSI used for short history.
pub const NEUTRAL_RSI: f64 = 50.0;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        check_period("rsi", period)?;
        Ok(Self {
            period,
            name: format!("rsi_{period}"),
        })
    }
}

impl Indicator for Rsi {
    type Output = Vec<f64>;

    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, series: &CandleSeries) -> Vec<f64> {
        rsi_series(series.close(), self.period)
    }
}

/// RSI over raw closes. `period` must be >= 1.
pub(crate) fn rsi_series(closes: &[f64], period: usize) -> Vec<f64> {
    let n = closes.len();
    let mut result = vec![NEUTRAL_RSI; n];

    if n < period + 1 {
        return result;
    }

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for i in 1..=period {
        let change = closes[i] - closes[i - 1];
        if change > 0.0 {
            avg_gain += change;
        } else {
            avg_loss -= change;
        }
    }
    avg_gain /= period as f64;
    avg_loss /= period as f64;

    result[period] = compute_rsi(avg_gain, avg_loss);

    for i in (period + 1)..n {
        let change = closes[i] - closes[i - 1];
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);

        avg_gain = wilder_smooth(avg_gain, gain, period);
        avg_loss = wilder_smooth(avg_loss, loss, period);

        result[i] = compute_rsi(avg_gain, avg_loss);
    }

    result
}

fn compute_rsi(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, series_from_closes};

    #[test]
    fn rsi_all_gains() {
        let series = series_from_closes(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0]);
        let result = Rsi::new(3).unwrap().compute(&series);
        assert_approx(result[3], 100.0, 1e-9);
        assert_approx(result[5], 100.0, 1e-9);
    }

    #[test]
    fn rsi_all_losses() {
        let series = series_from_closes(&[105.0, 104.0, 103.0, 102.0, 101.0, 100.0]);
        let result = Rsi::new(3).unwrap().compute(&series);
        assert_approx(result[3], 0.0, 1e-9);
    }

    #[test]
    fn rsi_mixed_known_value() {
        // Changes: +0.34, -0.25, -0.48, +0.72
        // Seed (period 3): avg_gain = 0.34/3, avg_loss = 0.73/3
        // RSI[3] = 100 - 100 / (1 + 0.34/0.73)
        let series = series_from_closes(&[44.0, 44.34, 44.09, 43.61, 44.33]);
        let result = Rsi::new(3).unwrap().compute(&series);

        assert_eq!(result[0], NEUTRAL_RSI);
        assert_eq!(result[2], NEUTRAL_RSI);
        assert_approx(result[3], 100.0 - 100.0 / (1.0 + 0.34 / 0.73), 1e-9);

        // RSI[4]: avg_gain = (0.34/3*2 + 0.72)/3, avg_loss = (0.73/3*2)/3
        let gain = (0.34 / 3.0 * 2.0 + 0.72) / 3.0;
        let loss = (0.73 / 3.0 * 2.0) / 3.0;
        assert_approx(result[4], 100.0 - 100.0 / (1.0 + gain / loss), 1e-9);
    }

    #[test]
    fn rsi_flat_series_is_100() {
        // No losses at all: the avg_loss guard wins.
        let series = series_from_closes(&[50.0; 10]);
        let result = Rsi::new(3).unwrap().compute(&series);
        assert_eq!(result[9], 100.0);
    }

    #[test]
    fn rsi_short_history_is_neutral() {
        let series = series_from_closes(&[100.0, 101.0, 99.0]);
        let result = Rsi::new(14).unwrap().compute(&series);
        assert!(result.iter().all(|&v| v == NEUTRAL_RSI));
    }

    #[test]
    fn rsi_exactly_period_closes_is_neutral() {
        let closes: Vec<f64> = (0..14).map(|i| 100.0 + i as f64).collect();
        let result = Rsi::new(14).unwrap().compute(&series_from_closes(&closes));
        assert_eq!(*result.last().unwrap(), NEUTRAL_RSI);
    }

    #[test]
    fn rsi_bounds() {
        let series = series_from_closes(&[100.0, 105.0, 98.0, 110.0, 95.0, 115.0, 90.0, 120.0]);
        let result = Rsi::new(3).unwrap().compute(&series);
        for (i, &v) in result.iter().enumerate() {
            assert!((0.0..=100.0).contains(&v), "RSI out of bounds at bar {i}: {v}");
        }
    }

    #[test]
    fn rsi_lookback() {
        assert_eq!(Rsi::new(14).unwrap().lookback(), 14);
        assert!(Rsi::new(0).is_err());
    }
}
