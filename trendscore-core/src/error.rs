//! Malformed-input errors raised by the core.
//!
//! Short history is never an error: every indicator documents its own
//! fallback value. These variants cover input the caller must fix.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndicatorError {
    #[error("empty series: at least one value is required")]
    EmptySeries,

    #[error("column '{column}' has {actual} values, expected {expected}")]
    LengthMismatch {
        column: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid period {period} for {indicator}: must be >= 1")]
    InvalidPeriod {
        indicator: &'static str,
        period: usize,
    },

    #[error("invalid multiplier {value} for {indicator}: must be finite and > 0")]
    InvalidMultiplier { indicator: &'static str, value: f64 },

    #[error("candle {index} is malformed: {reason}")]
    InvalidCandle { index: usize, reason: CandleDefect },
}

/// Which OHLCV invariant a candle breaks.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CandleDefect {
    #[error("{field} is not finite ({value})")]
    NotFinite { field: &'static str, value: f64 },

    #[error("{field} is negative ({value})")]
    Negative { field: &'static str, value: f64 },

    #[error("high {high} is below max(open, close)")]
    HighBelowBody { high: f64 },

    #[error("low {low} is above min(open, close)")]
    LowAboveBody { low: f64 },
}

/// Invalid scoring or exit thresholds.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Reject a zero period with a named error.
pub(crate) fn check_period(indicator: &'static str, period: usize) -> Result<(), IndicatorError> {
    if period == 0 {
        return Err(IndicatorError::InvalidPeriod { indicator, period });
    }
    Ok(())
}

pub(crate) fn check_multiplier(indicator: &'static str, value: f64) -> Result<(), IndicatorError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(IndicatorError::InvalidMultiplier { indicator, value });
    }
    Ok(())
}
