//! MACD: Moving Average Convergence Divergence.
//!
//! MACD[t] = EMA(close, fast)[t] - EMA(close, slow)[t]
//! Signal  = EMA(MACD, signal) over the whole aligned MACD line
//! Histogram = MACD - Signal
//!
//! Both EMA series carry the raw close during their warmup, so the MACD line
//! is 0 until the fast EMA seeds and is measured against the raw close until
//! the slow one does. The signal EMA runs over all of it, warmup included.

use super::Indicator;
use crate::domain::CandleSeries;
use crate::error::{check_period, IndicatorError};
use crate::series::ema_series_unchecked;

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
    name: String,
}

/// Aligned MACD line, signal line and histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdOutput {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

impl MacdOutput {
    pub fn latest_macd(&self) -> f64 {
        super::last(&self.macd)
    }

    pub fn latest_signal(&self) -> f64 {
        super::last(&self.signal)
    }

    pub fn latest_histogram(&self) -> f64 {
        super::last(&self.histogram)
    }

    /// Histogram above its previous value. False with a single bar.
    pub fn histogram_rising(&self) -> bool {
        match self.histogram.as_slice() {
            [.., prev, curr] => curr > prev,
            _ => false,
        }
    }
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Result<Self, IndicatorError> {
        check_period("macd_fast", fast)?;
        check_period("macd_slow", slow)?;
        check_period("macd_signal", signal)?;
        Ok(Self {
            fast,
            slow,
            signal,
            name: format!("macd_{fast}_{slow}_{signal}"),
        })
    }

    /// The conventional 12/26/9 configuration.
    pub fn standard() -> Self {
        Self {
            fast: 12,
            slow: 26,
            signal: 9,
            name: "macd_12_26_9".to_string(),
        }
    }
}

impl Indicator for Macd {
    type Output = MacdOutput;

    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.slow + self.signal - 2
    }

    fn compute(&self, series: &CandleSeries) -> MacdOutput {
        let closes = series.close();
        let fast = ema_series_unchecked(closes, self.fast);
        let slow = ema_series_unchecked(closes, self.slow);
        let macd: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal = ema_series_unchecked(&macd, self.signal);
        let histogram: Vec<f64> = macd.iter().zip(&signal).map(|(m, s)| m - s).collect();

        MacdOutput {
            macd,
            signal,
            histogram,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::ema::Ema;
    use crate::indicators::{assert_approx, series_from_closes, DEFAULT_EPSILON};

    #[test]
    fn macd_is_difference_of_emas() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64 * 0.4).sin() * 5.0).collect();
        let series = series_from_closes(&closes);
        let out = Macd::new(3, 6, 3).unwrap().compute(&series);
        let fast = Ema::new(3).unwrap().compute(&series);
        let slow = Ema::new(6).unwrap().compute(&series);
        for i in 5..40 {
            assert_approx(out.macd[i], fast[i] - slow[i], DEFAULT_EPSILON);
            assert_approx(out.histogram[i], out.macd[i] - out.signal[i], DEFAULT_EPSILON);
        }
    }

    #[test]
    fn macd_bullish_on_accelerating_rise() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 * 1.01_f64.powi(i)).collect();
        let out = Macd::standard().compute(&series_from_closes(&closes));
        assert!(out.latest_macd() > 0.0);
        assert!(out.latest_macd() > out.latest_signal());
        assert!(out.latest_histogram() > 0.0);
    }

    #[test]
    fn macd_bullish_on_linear_rise() {
        // Both EMAs lag a straight line by a constant, so the MACD line
        // settles at 7 per unit of slope; the signal still trails it.
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let out = Macd::standard().compute(&series_from_closes(&closes));
        assert_approx(out.latest_macd(), 7.0, 1e-9);
        assert!(out.latest_macd() > out.latest_signal());
        assert!(out.latest_histogram() > 0.0);
    }

    #[test]
    fn signal_runs_over_warmup_differences() {
        let closes: Vec<f64> = (0..40).map(|i| 50.0 + (i as f64 * 0.3).cos() * 4.0).collect();
        let out = Macd::new(3, 6, 3).unwrap().compute(&series_from_closes(&closes));
        let expected = crate::series::ema_series(&out.macd, 3).unwrap();
        for i in 0..40 {
            assert_approx(out.signal[i], expected[i], DEFAULT_EPSILON);
        }
        // Fast EMA seeded at index 2 while the slow one still carries the close.
        assert!(out.macd[3] != 0.0);
    }

    #[test]
    fn macd_short_history_is_zero() {
        let out = Macd::standard().compute(&series_from_closes(&[10.0, 11.0, 12.0]));
        assert_eq!(out.latest_macd(), 0.0);
        assert_eq!(out.latest_signal(), 0.0);
        assert_eq!(out.latest_histogram(), 0.0);
        assert!(!out.histogram_rising());
    }

    #[test]
    fn histogram_rising_compares_last_two() {
        let out = MacdOutput {
            macd: vec![0.0; 3],
            signal: vec![0.0; 3],
            histogram: vec![0.5, 0.1, 0.2],
        };
        assert!(out.histogram_rising());
        let out = MacdOutput {
            histogram: vec![0.5, 0.3, 0.2],
            ..out
        };
        assert!(!out.histogram_rising());
    }

    #[test]
    fn macd_rejects_zero_periods() {
        assert!(Macd::new(0, 26, 9).is_err());
        assert!(Macd::new(12, 0, 9).is_err());
        assert!(Macd::new(12, 26, 0).is_err());
    }

    #[test]
    fn macd_lookback() {
        assert_eq!(Macd::standard().lookback(), 33);
        assert_eq!(Macd::standard().name(), "macd_12_26_9");
    }
}
