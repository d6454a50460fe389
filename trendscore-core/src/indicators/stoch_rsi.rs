//! Stochastic RSI: the stochastic oscillator applied to the RSI series.
//!
//! %K[t] = (RSI[t] - min) / (max - min) * 100 over the trailing
//! `stoch_period` RSI values, 50 when the window is flat.
//! %D[t] = mean of the last three %K values (fewer while only one or two
//! %K values exist).
//!
//! Only RSI values past the RSI warmup enter a window, so the first %K sits
//! at index rsi_period + stoch_period - 1. Earlier positions hold 50.

use super::rsi::{rsi_series, NEUTRAL_RSI};
use super::Indicator;
use crate::domain::CandleSeries;
use crate::error::{check_period, IndicatorError};
use crate::series::mean;

const D_SMOOTHING: usize = 3;

#[derive(Debug, Clone)]
pub struct StochRsi {
    rsi_period: usize,
    stoch_period: usize,
    name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StochRsiOutput {
    pub k: Vec<f64>,
    pub d: Vec<f64>,
}

impl StochRsi {
    pub fn new(rsi_period: usize, stoch_period: usize) -> Result<Self, IndicatorError> {
        check_period("stoch_rsi_rsi", rsi_period)?;
        check_period("stoch_rsi_stoch", stoch_period)?;
        Ok(Self {
            rsi_period,
            stoch_period,
            name: format!("stoch_rsi_{rsi_period}_{stoch_period}"),
        })
    }
}

impl Indicator for StochRsi {
    type Output = StochRsiOutput;

    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.rsi_period + self.stoch_period - 1
    }

    fn compute(&self, series: &CandleSeries) -> StochRsiOutput {
        let n = series.len();
        let mut k = vec![NEUTRAL_RSI; n];
        let mut d = vec![NEUTRAL_RSI; n];

        let first_k = self.lookback();
        if n <= first_k {
            return StochRsiOutput { k, d };
        }

        let rsi = rsi_series(series.close(), self.rsi_period);
        for i in first_k..n {
            let window = &rsi[i + 1 - self.stoch_period..=i];
            let (lo, hi) = window
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                    (lo.min(v), hi.max(v))
                });
            let range = hi - lo;
            k[i] = if range > 0.0 {
                (rsi[i] - lo) / range * 100.0
            } else {
                NEUTRAL_RSI
            };

            let d_start = (i + 1).saturating_sub(D_SMOOTHING).max(first_k);
            d[i] = mean(&k[d_start..=i]);
        }

        StochRsiOutput { k, d }
    }
}
