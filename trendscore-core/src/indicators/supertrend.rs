//! Supertrend: ATR-based trailing trend line with a binary state.
//!
//! Inherently sequential: a forward scan carries one small accumulator
//! (`trend`, `final_upper`, `final_lower`) from bar to bar.
//!
//! - ATR here is the rolling mean of the trailing `period` true ranges,
//!   recomputed at every bar.
//! - basic bands: HL2 ± multiplier * ATR
//! - final upper carries forward unless the basic upper tightens below it or
//!   the previous close broke above it; final lower mirrors this
//! - up → down when close <= final lower, down → up when close >= final upper
//!
//! Output value: final lower while trending up, final upper while down.
//! Lookback: period. Warmup bars report the close itself with an up trend.

use serde::{Deserialize, Serialize};

use super::atr::true_range;
use super::Indicator;
use crate::domain::CandleSeries;
use crate::error::{check_multiplier, check_period, IndicatorError};
use crate::series::mean;

/// Supertrend state for one bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Up,
    Down,
}

impl Trend {
    /// +1 for up, -1 for down.
    pub fn as_i8(self) -> i8 {
        match self {
            Self::Up => 1,
            Self::Down => -1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Supertrend {
    period: usize,
    multiplier: f64,
    name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SupertrendOutput {
    pub value: Vec<f64>,
    pub trend: Vec<Trend>,
}

impl SupertrendOutput {
    pub fn latest_value(&self) -> f64 {
        super::last(&self.value)
    }

    pub fn latest_trend(&self) -> Trend {
        self.trend.last().copied().unwrap_or(Trend::Up)
    }
}

/// Carry-forward accumulator for the scan.
#[derive(Debug, Clone, Copy)]
struct BandState {
    trend: Trend,
    final_upper: f64,
    final_lower: f64,
}

impl BandState {
    fn seed(basic_upper: f64, basic_lower: f64) -> Self {
        Self {
            trend: Trend::Up,
            final_upper: basic_upper,
            final_lower: basic_lower,
        }
    }

    fn advance(self, basic_upper: f64, basic_lower: f64, prev_close: f64, close: f64) -> Self {
        let final_upper = if basic_upper < self.final_upper || prev_close > self.final_upper {
            basic_upper
        } else {
            self.final_upper
        };
        let final_lower = if basic_lower > self.final_lower || prev_close < self.final_lower {
            basic_lower
        } else {
            self.final_lower
        };

        let trend = match self.trend {
            Trend::Up if close <= final_lower => Trend::Down,
            Trend::Down if close >= final_upper => Trend::Up,
            unchanged => unchanged,
        };

        Self {
            trend,
            final_upper,
            final_lower,
        }
    }

    fn value(&self) -> f64 {
        match self.trend {
            Trend::Up => self.final_lower,
            Trend::Down => self.final_upper,
        }
    }
}

impl Supertrend {
    pub fn new(period: usize, multiplier: f64) -> Result<Self, IndicatorError> {
        check_period("supertrend", period)?;
        check_multiplier("supertrend", multiplier)?;
        Ok(Self {
            period,
            multiplier,
            name: format!("supertrend_{period}_{multiplier}"),
        })
    }

    fn basic_bands(&self, series: &CandleSeries, i: usize, atr: f64) -> (f64, f64) {
        let hl2 = series.hl2(i);
        (hl2 + self.multiplier * atr, hl2 - self.multiplier * atr)
    }
}

impl Indicator for Supertrend {
    type Output = SupertrendOutput;

    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, series: &CandleSeries) -> SupertrendOutput {
        let closes = series.close();
        let n = closes.len();
        let mut out = SupertrendOutput {
            value: closes.to_vec(),
            trend: vec![Trend::Up; n],
        };

        let start = self.period;
        if n < start + 1 {
            return out;
        }

        let tr = true_range(series);
        let atr_at = |i: usize| mean(&tr[i + 1 - self.period..=i]);

        let (upper, lower) = self.basic_bands(series, start, atr_at(start));
        let mut state = BandState::seed(upper, lower);
        out.value[start] = state.value();

        for i in (start + 1)..n {
            let (upper, lower) = self.basic_bands(series, i, atr_at(i));
            state = state.advance(upper, lower, closes[i - 1], closes[i]);
            out.value[i] = state.value();
            out.trend[i] = state.trend;
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, series_from_ohlc, DEFAULT_EPSILON};

    fn uptrend(n: usize) -> Vec<(f64, f64, f64, f64)> {
        (0..n)
            .map(|i| {
                let base = 100.0 + i as f64 * 2.0;
                (base - 1.0, base + 3.0, base - 3.0, base + 1.0)
            })
            .collect()
    }

    fn downtrend(n: usize) -> Vec<(f64, f64, f64, f64)> {
        (0..n)
            .map(|i| {
                let base = 200.0 - i as f64 * 3.0;
                (base + 1.0, base + 3.0, base - 3.0, base - 1.0)
            })
            .collect()
    }

    #[test]
    fn supertrend_seed_value() {
        let series = series_from_ohlc(&uptrend(5));
        let out = Supertrend::new(3, 2.0).unwrap().compute(&series);
        // TR[1..=3] = 6 each → ATR 6; HL2 at bar 3 = 106 → lower = 106 - 12
        assert_approx(out.value[3], 94.0, DEFAULT_EPSILON);
        assert_eq!(out.trend[3], Trend::Up);
    }

    #[test]
    fn supertrend_uptrend_below_price() {
        let series = series_from_ohlc(&uptrend(15));
        let out = Supertrend::new(3, 2.0).unwrap().compute(&series);
        for i in 3..15 {
            assert_eq!(out.trend[i], Trend::Up);
            assert!(
                out.value[i] < series.close()[i],
                "supertrend ({}) should be below close ({}) at bar {i}",
                out.value[i],
                series.close()[i]
            );
        }
    }

    #[test]
    fn supertrend_downtrend_flips_above_price() {
        let series = series_from_ohlc(&downtrend(15));
        let out = Supertrend::new(3, 2.0).unwrap().compute(&series);
        // Final lower holds at 179 until close 178 at bar 7 breaks it.
        assert_eq!(out.trend[6], Trend::Up);
        assert_eq!(out.trend[7], Trend::Down);
        for i in 7..15 {
            assert!(out.value[i] > series.close()[i]);
        }
        assert_eq!(out.latest_trend().as_i8(), -1);
    }

    #[test]
    fn supertrend_recovers_after_reversal() {
        let mut data = downtrend(15);
        let last_close = data[14].3;
        for i in 1..=15 {
            let base = last_close + i as f64 * 4.0;
            data.push((base - 2.0, base + 3.0, base - 3.0, base + 2.0));
        }
        let out = Supertrend::new(3, 2.0)
            .unwrap()
            .compute(&series_from_ohlc(&data));
        assert!(out.trend[..15].contains(&Trend::Down));
        assert_eq!(out.latest_trend(), Trend::Up);
    }

    #[test]
    fn band_width_tracks_small_ranges_after_huge_ones() {
        let mut data = vec![(1e16, 1.1e16, 0.9e16, 1e16); 200];
        data.extend(std::iter::repeat((1.0, 1.1, 0.9, 1.0)).take(30));
        let out = Supertrend::new(10, 3.0)
            .unwrap()
            .compute(&series_from_ohlc(&data));
        // The crash flips the trend; once the window holds only small bars
        // the upper band sits at HL2 + 3 * 0.2.
        assert_eq!(out.latest_trend(), Trend::Down);
        assert_approx(out.latest_value(), 1.6, 1e-9);
    }

    #[test]
    fn supertrend_short_history_reports_close() {
        let series = series_from_ohlc(&[(100.0, 105.0, 95.0, 102.0)]);
        let out = Supertrend::new(10, 3.0).unwrap().compute(&series);
        assert_eq!(out.latest_value(), 102.0);
        assert_eq!(out.latest_trend(), Trend::Up);
    }

    #[test]
    fn supertrend_rejects_bad_params() {
        assert!(Supertrend::new(0, 3.0).is_err());
        assert!(Supertrend::new(10, -1.0).is_err());
        assert_eq!(Supertrend::new(10, 3.0).unwrap().lookback(), 10);
    }
}
