//! Exit evaluation: counts trend-invalidation signals for an open
//! position and decides whether it should be force-closed.

use serde::{Deserialize, Serialize};

use crate::domain::PositionSide;
use crate::engine::IndicatorSnapshot;
use crate::error::ConfigError;

/// Number of distinct invalidation signals.
pub const MAX_SIGNALS: u8 = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExitConfig {
    /// Signal count that closes the position regardless of PnL.
    pub invalidation_close_threshold_signals: u8,
    /// Signal count that closes the position only while PnL is below
    /// `invalidation_min_pnl_threshold`.
    pub pnl_gated_signals: u8,
    /// PnL percent below which `pnl_gated_signals` is enough to close.
    pub invalidation_min_pnl_threshold: f64,
    /// Slow ADX below this counts as a fading trend.
    pub weak_trend_adx: f64,
}

impl Default for ExitConfig {
    fn default() -> Self {
        Self {
            invalidation_close_threshold_signals: 3,
            pnl_gated_signals: 2,
            invalidation_min_pnl_threshold: -3.0,
            weak_trend_adx: 20.0,
        }
    }
}

impl ExitConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let close = self.invalidation_close_threshold_signals;
        if close == 0 || close > MAX_SIGNALS {
            return Err(ConfigError::invalid(
                "invalidation_close_threshold_signals",
                format!("{close} must be within 1..={MAX_SIGNALS}"),
            ));
        }
        if self.pnl_gated_signals == 0 || self.pnl_gated_signals > close {
            return Err(ConfigError::invalid(
                "pnl_gated_signals",
                format!(
                    "{} must be within 1..={close}",
                    self.pnl_gated_signals
                ),
            ));
        }
        if !self.invalidation_min_pnl_threshold.is_finite() {
            return Err(ConfigError::invalid(
                "invalidation_min_pnl_threshold",
                "must be finite",
            ));
        }
        if !self.weak_trend_adx.is_finite() || self.weak_trend_adx < 0.0 {
            return Err(ConfigError::invalid(
                "weak_trend_adx",
                format!("{} must be finite and >= 0", self.weak_trend_adx),
            ));
        }
        Ok(())
    }
}

/// One way the trend behind a position can break down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidationSignal {
    /// Price on the wrong side of fast EMA20.
    PriceCrossedEma,
    /// Fast MACD on the wrong side of zero.
    MacdFlipped,
    /// Slow ADX below the weak-trend level.
    TrendWeakened,
    /// Slow EMA20/EMA50 ordering against the position.
    TrendReversed,
}

impl InvalidationSignal {
    fn describe(&self, side: PositionSide) -> &'static str {
        match (self, side) {
            (Self::PriceCrossedEma, PositionSide::Long) => "price below fast EMA20",
            (Self::PriceCrossedEma, PositionSide::Short) => "price above fast EMA20",
            (Self::MacdFlipped, PositionSide::Long) => "fast MACD negative",
            (Self::MacdFlipped, PositionSide::Short) => "fast MACD positive",
            (Self::TrendWeakened, _) => "slow ADX below weak-trend level",
            (Self::TrendReversed, PositionSide::Long) => "slow EMA20 below EMA50",
            (Self::TrendReversed, PositionSide::Short) => "slow EMA20 above EMA50",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvalidationResult {
    pub signal_count: u8,
    pub reasons: Vec<String>,
    pub should_close: bool,
    pub triggers: Vec<InvalidationSignal>,
}

/// Evaluate whether an open position should be force-closed.
pub fn evaluate_exit(
    fast: &IndicatorSnapshot,
    slow: &IndicatorSnapshot,
    price: f64,
    side: PositionSide,
    pnl_percent: f64,
    config: &ExitConfig,
) -> InvalidationResult {
    let checks = match side {
        PositionSide::Long => [
            (InvalidationSignal::PriceCrossedEma, price < fast.ema20),
            (InvalidationSignal::MacdFlipped, fast.macd < 0.0),
            (InvalidationSignal::TrendWeakened, slow.adx < config.weak_trend_adx),
            (InvalidationSignal::TrendReversed, slow.ema20 < slow.ema50),
        ],
        PositionSide::Short => [
            (InvalidationSignal::PriceCrossedEma, price > fast.ema20),
            (InvalidationSignal::MacdFlipped, fast.macd > 0.0),
            (InvalidationSignal::TrendWeakened, slow.adx < config.weak_trend_adx),
            (InvalidationSignal::TrendReversed, slow.ema20 > slow.ema50),
        ],
    };

    let triggers: Vec<InvalidationSignal> = checks
        .into_iter()
        .filter_map(|(signal, fired)| fired.then_some(signal))
        .collect();
    let reasons = triggers
        .iter()
        .map(|s| s.describe(side).to_string())
        .collect();
    let signal_count = triggers.len() as u8;

    let should_close = signal_count >= config.invalidation_close_threshold_signals
        || (signal_count >= config.pnl_gated_signals
            && pnl_percent < config.invalidation_min_pnl_threshold);

    InvalidationResult {
        signal_count,
        reasons,
        should_close,
        triggers,
    }
}
