//! Exponential Moving Average (EMA) of closes.
//!
//! Seed: SMA of the first `period` closes at index period-1.
//! Recursive: EMA[t] = (close[t] - EMA[t-1]) * 2/(period+1) + EMA[t-1].
//! Warmup positions carry the raw close; fewer than `period` bars returns
//! the closes unchanged.

use super::Indicator;
use crate::domain::CandleSeries;
use crate::error::{check_period, IndicatorError};
use crate::series::ema_series_unchecked;

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    name: String,
}

impl Ema {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        check_period("ema", period)?;
        Ok(Self {
            period,
            name: format!("ema_{period}"),
        })
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl Indicator for Ema {
    type Output = Vec<f64>;

    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, series: &CandleSeries) -> Vec<f64> {
        ema_series_unchecked(series.close(), self.period)
    }
}
