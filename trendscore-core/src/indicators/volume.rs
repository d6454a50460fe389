//! Volume moving average and volume ratio.
//!
//! average[t] = SMA(volume, period) with the SMA short-window fallback
//! (a bar without a full window averages to its own volume).
//! ratio[t] = volume[t] / average[t], 1.0 when the average is 0.

use super::Indicator;
use crate::domain::CandleSeries;
use crate::error::{check_period, IndicatorError};
use crate::series::rolling_sma;

#[derive(Debug, Clone)]
pub struct VolumeRatio {
    period: usize,
    name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VolumeOutput {
    pub average: Vec<f64>,
    pub ratio: Vec<f64>,
}

impl VolumeRatio {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        check_period("volume_ratio", period)?;
        Ok(Self {
            period,
            name: format!("volume_ratio_{period}"),
        })
    }
}

impl Indicator for VolumeRatio {
    type Output = VolumeOutput;

    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, series: &CandleSeries) -> VolumeOutput {
        let volume = series.volume();
        let average = rolling_sma(volume, self.period);
        let ratio = volume
            .iter()
            .zip(&average)
            .map(|(&v, &avg)| if avg > 0.0 { v / avg } else { 1.0 })
            .collect();
        VolumeOutput { average, ratio }
    }
}
