//! Bollinger Bands: moving average +/- standard deviation multiplier.
//!
//! - Middle: SMA(close, period)
//! - Upper: middle + mult * stddev(close, period)
//! - Lower: middle - mult * stddev(close, period)
//! - %B: (close - lower) / (upper - lower), 0.5 when the bands have no width
//!
//! Uses population stddev (divide by N).
//! Lookback: period - 1. Positions without a full window collapse all three
//! bands onto that bar's close with %B = 0.5.

use super::Indicator;
use crate::domain::CandleSeries;
use crate::error::{check_multiplier, check_period, IndicatorError};
use crate::series::{mean, population_stddev};

#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    multiplier: f64,
    name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerOutput {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
    pub percent_b: Vec<f64>,
}

impl Bollinger {
    pub fn new(period: usize, multiplier: f64) -> Result<Self, IndicatorError> {
        check_period("bollinger", period)?;
        check_multiplier("bollinger", multiplier)?;
        Ok(Self {
            period,
            multiplier,
            name: format!("bollinger_{period}_{multiplier}"),
        })
    }
}

impl Indicator for Bollinger {
    type Output = BollingerOutput;

    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, series: &CandleSeries) -> BollingerOutput {
        let closes = series.close();
        let n = closes.len();
        let mut out = BollingerOutput {
            upper: closes.to_vec(),
            middle: closes.to_vec(),
            lower: closes.to_vec(),
            percent_b: vec![0.5; n],
        };

        if n < self.period {
            return out;
        }

        for i in (self.period - 1)..n {
            let window = &closes[i + 1 - self.period..=i];
            let middle = mean(window);
            let stddev = population_stddev(window, middle);
            let upper = middle + self.multiplier * stddev;
            let lower = middle - self.multiplier * stddev;
            let width = upper - lower;

            out.upper[i] = upper;
            out.middle[i] = middle;
            out.lower[i] = lower;
            out.percent_b[i] = if width > 0.0 {
                (closes[i] - lower) / width
            } else {
                0.5
            };
        }

        out
    }
}
