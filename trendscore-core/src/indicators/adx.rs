//! ADX: Average Directional Index (Wilder), with +DI and -DI.
//!
//! Steps:
//! 1. +DM = up move if it beats the down move and is positive, else 0
//!    (-DM mirrors with the down move)
//! 2. Wilder-smooth +DM, -DM and TR (seed: mean of the first `period` bars)
//! 3. +DI = 100 * smoothed(+DM) / smoothed(TR), -DI analogous
//! 4. DX = 100 * |+DI - -DI| / (+DI + -DI)
//! 5. ADX = Wilder-smoothed DX, seeded with the first DX
//!
//! Lookback: period. Fewer than period+1 bars → ADX, +DI and -DI are 0.
//! Zero denominators (flat TR, zero DI sum) yield 0.

use super::atr::{true_range, wilder_series};
use super::Indicator;
use crate::domain::CandleSeries;
use crate::error::{check_period, IndicatorError};
use crate::series::wilder_smooth;

#[derive(Debug, Clone)]
pub struct Adx {
    period: usize,
    name: String,
}

/// Aligned ADX, +DI and -DI series.
#[derive(Debug, Clone, PartialEq)]
pub struct AdxOutput {
    pub adx: Vec<f64>,
    pub plus_di: Vec<f64>,
    pub minus_di: Vec<f64>,
}

impl Adx {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        check_period("adx", period)?;
        Ok(Self {
            period,
            name: format!("adx_{period}"),
        })
    }
}

/// +DM and -DM per bar. Index 0 is 0 (no previous bar).
pub fn directional_movement(series: &CandleSeries) -> (Vec<f64>, Vec<f64>) {
    let (high, low) = (series.high(), series.low());
    let n = series.len();
    let mut plus_dm = vec![0.0; n];
    let mut minus_dm = vec![0.0; n];

    for i in 1..n {
        let high_diff = high[i] - high[i - 1];
        let low_diff = low[i - 1] - low[i];

        if high_diff > low_diff && high_diff > 0.0 {
            plus_dm[i] = high_diff;
        }
        if low_diff > high_diff && low_diff > 0.0 {
            minus_dm[i] = low_diff;
        }
    }

    (plus_dm, minus_dm)
}

impl Indicator for Adx {
    type Output = AdxOutput;

    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, series: &CandleSeries) -> AdxOutput {
        let n = series.len();
        let mut adx = vec![0.0; n];
        let mut plus_di = vec![0.0; n];
        let mut minus_di = vec![0.0; n];

        if n < self.period + 1 {
            return AdxOutput {
                adx,
                plus_di,
                minus_di,
            };
        }

        let (plus_dm, minus_dm) = directional_movement(series);
        let smooth_tr = wilder_series(&true_range(series), self.period);
        let smooth_plus = wilder_series(&plus_dm, self.period);
        let smooth_minus = wilder_series(&minus_dm, self.period);

        let mut prev_adx: Option<f64> = None;
        for i in self.period..n {
            if smooth_tr[i] > 0.0 {
                plus_di[i] = 100.0 * smooth_plus[i] / smooth_tr[i];
                minus_di[i] = 100.0 * smooth_minus[i] / smooth_tr[i];
            }

            let di_sum = plus_di[i] + minus_di[i];
            let dx = if di_sum > 0.0 {
                100.0 * (plus_di[i] - minus_di[i]).abs() / di_sum
            } else {
                0.0
            };

            let value = match prev_adx {
                None => dx,
                Some(prev) => wilder_smooth(prev, dx, self.period),
            };
            adx[i] = value;
            prev_adx = Some(value);
        }

        AdxOutput {
            adx,
            plus_di,
            minus_di,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, series_from_ohlc, DEFAULT_EPSILON};

    fn choppy() -> CandleSeries {
        series_from_ohlc(&[
            (100.0, 105.0, 95.0, 102.0),
            (102.0, 108.0, 100.0, 106.0),
            (106.0, 107.0, 98.0, 99.0),
            (99.0, 103.0, 97.0, 101.0),
            (101.0, 106.0, 100.0, 105.0),
            (105.0, 110.0, 103.0, 108.0),
            (108.0, 112.0, 106.0, 110.0),
            (110.0, 111.0, 104.0, 105.0),
            (105.0, 109.0, 103.0, 107.0),
            (107.0, 113.0, 105.0, 112.0),
        ])
    }

    #[test]
    fn directional_movement_rules() {
        let (plus, minus) = directional_movement(&choppy());
        // bar 1: up 3, down -5 → +DM 3
        assert_eq!(plus[1], 3.0);
        assert_eq!(minus[1], 0.0);
        // bar 2: up -1, down 2 → -DM 2
        assert_eq!(plus[2], 0.0);
        assert_eq!(minus[2], 2.0);
    }

    #[test]
    fn adx_first_value_is_first_dx() {
        let out = Adx::new(3).unwrap().compute(&choppy());
        // TR[1..=3] = 8, 9, 6 → 23/3; +DM = 3, 0, 0 → 1; -DM = 0, 2, 1 → 1
        let tr = 23.0 / 3.0;
        let plus = 100.0 / tr;
        let minus = 100.0 / tr;
        assert_approx(out.plus_di[3], plus, DEFAULT_EPSILON);
        assert_approx(out.minus_di[3], minus, DEFAULT_EPSILON);
        // Equal DIs → DX 0 → ADX seeded at 0
        assert_approx(out.adx[3], 0.0, DEFAULT_EPSILON);
    }

    #[test]
    fn adx_bounds() {
        let out = Adx::new(3).unwrap().compute(&choppy());
        for i in 0..out.adx.len() {
            assert!((0.0..=100.0).contains(&out.adx[i]), "ADX out of bounds at {i}");
            assert!(out.plus_di[i] >= 0.0);
            assert!(out.minus_di[i] >= 0.0);
        }
    }

    #[test]
    fn adx_strong_trend_higher() {
        let data: Vec<_> = (0..30)
            .map(|i| {
                let base = 100.0 + i as f64 * 5.0;
                (base - 1.0, base + 3.0, base - 3.0, base + 2.0)
            })
            .collect();
        let out = Adx::new(5).unwrap().compute(&series_from_ohlc(&data));
        let last = *out.adx.last().unwrap();
        assert!(last > 50.0, "ADX should be elevated in strong trend, got {last}");
        assert!(out.plus_di.last().unwrap() > out.minus_di.last().unwrap());
    }

    #[test]
    fn adx_short_history_is_zero() {
        let out = Adx::new(14).unwrap().compute(&choppy());
        assert!(out.adx.iter().all(|&v| v == 0.0));
        assert!(out.plus_di.iter().all(|&v| v == 0.0));
        assert!(out.minus_di.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn adx_flat_market_is_zero() {
        let out = Adx::new(3).unwrap().compute(&series_from_ohlc(&[(10.0, 10.0, 10.0, 10.0); 8]));
        assert!(out.adx.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn adx_lookback() {
        assert_eq!(Adx::new(14).unwrap().lookback(), 14);
        assert!(Adx::new(0).is_err());
    }
}
