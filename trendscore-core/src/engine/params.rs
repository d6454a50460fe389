//! Indicator parameters for the snapshot engine.
//!
//! The EMA, RSI and ATR lengths are part of the snapshot field names
//! (`ema20`, `rsi7`, `atr14`, ...) and are therefore fixed constants. The
//! remaining indicators take their lengths and multipliers from here.

use serde::{Deserialize, Serialize};

use crate::error::{check_multiplier, check_period, IndicatorError};

pub const EMA_FAST_PERIOD: usize = 20;
pub const EMA_SLOW_PERIOD: usize = 50;
pub const RSI_FAST_PERIOD: usize = 7;
pub const RSI_SLOW_PERIOD: usize = 14;
pub const ATR_FAST_PERIOD: usize = 3;
pub const ATR_SLOW_PERIOD: usize = 14;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorParams {
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub adx_period: usize,
    pub bollinger_period: usize,
    pub bollinger_multiplier: f64,
    pub stoch_rsi_period: usize,
    pub stoch_period: usize,
    pub supertrend_period: usize,
    pub supertrend_multiplier: f64,
    pub volume_ma_period: usize,
    /// Number of trailing values kept per indicator in the snapshot.
    /// 0 disables the trailing series.
    pub trailing_len: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            adx_period: 14,
            bollinger_period: 20,
            bollinger_multiplier: 2.0,
            stoch_rsi_period: 14,
            stoch_period: 14,
            supertrend_period: 10,
            supertrend_multiplier: 3.0,
            volume_ma_period: 20,
            trailing_len: 10,
        }
    }
}

impl IndicatorParams {
    /// Reject zero periods, non-positive multipliers and a MACD whose fast
    /// leg is not shorter than its slow leg.
    pub fn validate(&self) -> Result<(), IndicatorError> {
        check_period("macd_fast", self.macd_fast)?;
        check_period("macd_slow", self.macd_slow)?;
        check_period("macd_signal", self.macd_signal)?;
        if self.macd_fast >= self.macd_slow {
            return Err(IndicatorError::InvalidPeriod {
                indicator: "macd_fast (must be < macd_slow)",
                period: self.macd_fast,
            });
        }
        check_period("adx", self.adx_period)?;
        check_period("bollinger", self.bollinger_period)?;
        check_multiplier("bollinger", self.bollinger_multiplier)?;
        check_period("stoch_rsi_rsi", self.stoch_rsi_period)?;
        check_period("stoch_rsi_stoch", self.stoch_period)?;
        check_period("supertrend", self.supertrend_period)?;
        check_multiplier("supertrend", self.supertrend_multiplier)?;
        check_period("volume_ma", self.volume_ma_period)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(IndicatorParams::default().validate().is_ok());
    }

    #[test]
    fn inverted_macd_rejected() {
        let params = IndicatorParams {
            macd_fast: 26,
            macd_slow: 12,
            ..IndicatorParams::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn zero_multiplier_rejected() {
        let params = IndicatorParams {
            supertrend_multiplier: 0.0,
            ..IndicatorParams::default()
        };
        assert!(matches!(
            params.validate(),
            Err(IndicatorError::InvalidMultiplier {
                indicator: "supertrend",
                ..
            })
        ));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let params: IndicatorParams = serde_json::from_str(r#"{"adx_period": 10}"#).unwrap();
        assert_eq!(params.adx_period, 10);
        assert_eq!(params.macd_slow, 26);
    }
}
