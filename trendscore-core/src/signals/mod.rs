//! Entry scoring and exit evaluation over indicator snapshots.
//!
//! Both entry points are pure functions of their arguments: no clock, no
//! I/O, no state carried between calls. Entry scoring never sees open
//! positions; exit evaluation sees only the side and PnL it is handed.

pub mod exit;
pub mod gate;
pub mod score;

pub use exit::{evaluate_exit, ExitConfig, InvalidationResult, InvalidationSignal};
pub use gate::GateVerdict;
pub use score::{score, Criteria, ScoreResult, ScoringConfig, MAX_SCORE};

/// Neutral snapshot for hand-built scenarios: price 100, flat EMAs, no
/// trend, ratio 1.
#[cfg(test)]
pub(crate) fn test_snapshot() -> crate::engine::IndicatorSnapshot {
    crate::engine::IndicatorSnapshot {
        timestamp: None,
        price: 100.0,
        ema20: 100.0,
        ema50: 100.0,
        macd: 0.0,
        macd_signal: 0.0,
        macd_histogram: 0.0,
        macd_histogram_rising: false,
        rsi7: 50.0,
        rsi14: 50.0,
        atr3: 1.0,
        atr14: 1.0,
        adx: 0.0,
        plus_di: 0.0,
        minus_di: 0.0,
        bb_upper: 100.0,
        bb_middle: 100.0,
        bb_lower: 100.0,
        bb_percent_b: 0.5,
        volume: 1000.0,
        volume_ma: 1000.0,
        volume_ratio: 1.0,
        stoch_rsi_k: 50.0,
        stoch_rsi_d: 50.0,
        supertrend_value: 100.0,
        supertrend_trend: 1,
        series: None,
    }
}
