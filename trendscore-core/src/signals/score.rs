//! Entry scoring: pre-filters symbols before the expensive decision step.
//!
//! Three hard gates run first (volatility, volume, trend strength). The
//! slow timeframe's EMA20/EMA50 relationship then picks exactly one side to
//! score, and four criteria on the fast timeframe (plus the slow ADX) add
//! one point each.
//!
//! # Invariant
//! Only one side is ever scored per call, so `long_score` and `short_score`
//! can never both reach the required score.

use serde::{Deserialize, Serialize};

use super::gate::GateVerdict;
use crate::domain::Direction;
use crate::engine::IndicatorSnapshot;
use crate::error::ConfigError;

/// Number of scored criteria per side.
pub const MAX_SCORE: u8 = 4;

/// Entry thresholds. Supplied by the caller on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub rsi_long_min: f64,
    pub rsi_long_max: f64,
    pub rsi_short_min: f64,
    pub rsi_short_max: f64,
    pub min_volume_ratio: f64,
    pub min_trend_adx: f64,
    pub max_price_ema_distance_percent: f64,
    pub max_atr_percent: f64,
    pub min_required_score: u8,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            rsi_long_min: 40.0,
            rsi_long_max: 70.0,
            rsi_short_min: 30.0,
            rsi_short_max: 60.0,
            min_volume_ratio: 1.1,
            min_trend_adx: 20.0,
            max_price_ema_distance_percent: 3.0,
            max_atr_percent: 8.0,
            min_required_score: 3,
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_rsi_range("rsi_long", self.rsi_long_min, self.rsi_long_max)?;
        check_rsi_range("rsi_short", self.rsi_short_min, self.rsi_short_max)?;
        for (field, value) in [
            ("min_volume_ratio", self.min_volume_ratio),
            ("min_trend_adx", self.min_trend_adx),
            ("max_price_ema_distance_percent", self.max_price_ema_distance_percent),
            ("max_atr_percent", self.max_atr_percent),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(field, format!("{value} must be finite and >= 0")));
            }
        }
        if self.min_required_score == 0 || self.min_required_score > MAX_SCORE {
            return Err(ConfigError::invalid(
                "min_required_score",
                format!("{} must be within 1..={MAX_SCORE}", self.min_required_score),
            ));
        }
        Ok(())
    }
}

fn check_rsi_range(field: &'static str, min: f64, max: f64) -> Result<(), ConfigError> {
    if !(0.0..=100.0).contains(&min) || !(0.0..=100.0).contains(&max) || min > max {
        return Err(ConfigError::invalid(
            field,
            format!("[{min}, {max}] must be an ordered range within 0..=100"),
        ));
    }
    Ok(())
}

/// Which criteria held for the scored side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criteria {
    /// Fast MACD on the trend's side of its signal line.
    pub macd_confirms: bool,
    /// Fast RSI7 inside the side's RSI range.
    pub rsi_in_range: bool,
    /// Price within the allowed distance of fast EMA20, on the trend's side.
    pub near_ema: bool,
    /// Slow ADX strictly above the minimum trend strength.
    pub trend_strong: bool,
}

impl Criteria {
    pub fn count(&self) -> u8 {
        [
            self.macd_confirms,
            self.rsi_in_range,
            self.near_ema,
            self.trend_strong,
        ]
        .into_iter()
        .filter(|&held| held)
        .count() as u8
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub long_score: u8,
    pub short_score: u8,
    pub volume_ratio: f64,
    pub atr_percent: f64,
    pub gates_passed: bool,
    pub verdict: GateVerdict,
    /// Breakdown for the side that was scored; all false without a trend.
    pub criteria: Criteria,
    pub direction: Direction,
}

impl ScoreResult {
    /// Score of the side that was evaluated.
    pub fn best_score(&self) -> u8 {
        self.long_score.max(self.short_score)
    }
}

/// Score one symbol from its fast (entry) and slow (trend) snapshots.
///
/// The current price is the fast snapshot's last close.
pub fn score(fast: &IndicatorSnapshot, slow: &IndicatorSnapshot, config: &ScoringConfig) -> ScoreResult {
    let price = fast.price;
    let atr_percent = fast.atr_percent(price);

    let verdict = if atr_percent > config.max_atr_percent {
        GateVerdict::RejectedByVolatility
    } else if fast.volume_ratio < config.min_volume_ratio {
        GateVerdict::RejectedByVolume
    } else if slow.adx < config.min_trend_adx {
        GateVerdict::RejectedByTrendStrength
    } else {
        GateVerdict::Passed
    };

    let trend_strong = slow.adx > config.min_trend_adx;
    let distance_ok = fast
        .ema20_distance_percent(price)
        .is_some_and(|d| d <= config.max_price_ema_distance_percent);

    let (long_score, short_score, criteria) = if slow.is_uptrend() {
        let criteria = Criteria {
            macd_confirms: fast.macd > fast.macd_signal,
            rsi_in_range: (config.rsi_long_min..=config.rsi_long_max).contains(&fast.rsi7),
            near_ema: distance_ok && price >= fast.ema20,
            trend_strong,
        };
        (criteria.count(), 0, criteria)
    } else if slow.is_downtrend() {
        let criteria = Criteria {
            macd_confirms: fast.macd < fast.macd_signal,
            rsi_in_range: (config.rsi_short_min..=config.rsi_short_max).contains(&fast.rsi7),
            near_ema: distance_ok && price <= fast.ema20,
            trend_strong,
        };
        (0, criteria.count(), criteria)
    } else {
        (0, 0, Criteria::default())
    };

    let direction = if !verdict.is_passed() {
        Direction::None
    } else if long_score >= config.min_required_score {
        Direction::Long
    } else if short_score >= config.min_required_score {
        Direction::Short
    } else {
        Direction::None
    };

    ScoreResult {
        long_score,
        short_score,
        volume_ratio: fast.volume_ratio,
        atr_percent,
        gates_passed: verdict.is_passed(),
        verdict,
        criteria,
        direction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::test_snapshot;

    /// Fast snapshot meeting every long criterion.
    fn long_fast() -> IndicatorSnapshot {
        IndicatorSnapshot {
            price: 101.0,
            ema20: 100.0,
            macd: 0.8,
            macd_signal: 0.5,
            rsi7: 55.0,
            atr14: 2.0,
            volume_ratio: 1.5,
            ..test_snapshot()
        }
    }

    /// Slow snapshot in a strong uptrend.
    fn up_slow() -> IndicatorSnapshot {
        IndicatorSnapshot {
            ema20: 105.0,
            ema50: 100.0,
            adx: 30.0,
            ..test_snapshot()
        }
    }

    #[test]
    fn perfect_long_scores_four() {
        let result = score(&long_fast(), &up_slow(), &ScoringConfig::default());
        assert_eq!(result.long_score, 4);
        assert_eq!(result.short_score, 0);
        assert!(result.gates_passed);
        assert_eq!(result.direction, Direction::Long);
        assert_eq!(result.best_score(), 4);
    }

    #[test]
    fn perfect_short_scores_four() {
        let fast = IndicatorSnapshot {
            price: 99.0,
            ema20: 100.0,
            macd: -0.8,
            macd_signal: -0.5,
            rsi7: 45.0,
            ..long_fast()
        };
        let slow = IndicatorSnapshot {
            ema20: 95.0,
            ema50: 100.0,
            ..up_slow()
        };
        let result = score(&fast, &slow, &ScoringConfig::default());
        assert_eq!(result.short_score, 4);
        assert_eq!(result.long_score, 0);
        assert_eq!(result.direction, Direction::Short);
    }

    #[test]
    fn volume_gate_overrides_perfect_score() {
        let fast = IndicatorSnapshot {
            volume_ratio: 0.5,
            ..long_fast()
        };
        let result = score(&fast, &up_slow(), &ScoringConfig::default());
        assert_eq!(result.long_score, 4);
        assert!(!result.gates_passed);
        assert_eq!(result.verdict, GateVerdict::RejectedByVolume);
        assert_eq!(result.direction, Direction::None);
    }

    #[test]
    fn volatility_gate_rejects_first() {
        // ATR 10 on price 101 ≈ 9.9% > 8%
        let fast = IndicatorSnapshot {
            atr14: 10.0,
            volume_ratio: 0.5,
            ..long_fast()
        };
        let result = score(&fast, &up_slow(), &ScoringConfig::default());
        assert_eq!(result.verdict, GateVerdict::RejectedByVolatility);
        assert_eq!(result.direction, Direction::None);
    }

    #[test]
    fn weak_trend_gate() {
        let slow = IndicatorSnapshot {
            adx: 15.0,
            ..up_slow()
        };
        let result = score(&long_fast(), &slow, &ScoringConfig::default());
        assert_eq!(result.verdict, GateVerdict::RejectedByTrendStrength);
        assert_eq!(result.long_score, 3);
        assert!(!result.criteria.trend_strong);
        assert_eq!(result.direction, Direction::None);
    }

    #[test]
    fn adx_at_threshold_passes_gate_but_does_not_score() {
        let slow = IndicatorSnapshot {
            adx: 20.0,
            ..up_slow()
        };
        let result = score(&long_fast(), &slow, &ScoringConfig::default());
        assert!(result.gates_passed);
        assert_eq!(result.long_score, 3);
        assert_eq!(result.direction, Direction::Long);
    }

    #[test]
    fn price_below_ema_fails_long_distance_criterion() {
        let fast = IndicatorSnapshot {
            price: 99.5,
            ..long_fast()
        };
        let result = score(&fast, &up_slow(), &ScoringConfig::default());
        assert!(!result.criteria.near_ema);
        assert_eq!(result.long_score, 3);
    }

    #[test]
    fn price_too_far_from_ema_fails_distance_criterion() {
        let fast = IndicatorSnapshot {
            price: 104.0,
            ..long_fast()
        };
        let result = score(&fast, &up_slow(), &ScoringConfig::default());
        assert!(!result.criteria.near_ema);
    }

    #[test]
    fn two_criteria_is_not_enough() {
        let fast = IndicatorSnapshot {
            macd: 0.1,
            rsi7: 80.0,
            ..long_fast()
        };
        let result = score(&fast, &up_slow(), &ScoringConfig::default());
        assert_eq!(result.long_score, 2);
        assert_eq!(result.direction, Direction::None);
    }

    #[test]
    fn flat_slow_emas_score_nothing() {
        let slow = IndicatorSnapshot {
            ema20: 100.0,
            ema50: 100.0,
            ..up_slow()
        };
        let result = score(&long_fast(), &slow, &ScoringConfig::default());
        assert_eq!(result.long_score, 0);
        assert_eq!(result.short_score, 0);
        assert_eq!(result.criteria, Criteria::default());
        assert_eq!(result.direction, Direction::None);
    }

    #[test]
    fn min_required_score_is_configurable() {
        let config = ScoringConfig {
            min_required_score: 4,
            ..ScoringConfig::default()
        };
        let slow = IndicatorSnapshot {
            adx: 20.0,
            ..up_slow()
        };
        let result = score(&long_fast(), &slow, &config);
        assert_eq!(result.long_score, 3);
        assert_eq!(result.direction, Direction::None);
    }

    #[test]
    fn rsi_range_bounds_are_inclusive() {
        let fast = IndicatorSnapshot {
            rsi7: 70.0,
            ..long_fast()
        };
        let result = score(&fast, &up_slow(), &ScoringConfig::default());
        assert!(result.criteria.rsi_in_range);
    }

    #[test]
    fn config_validation() {
        assert!(ScoringConfig::default().validate().is_ok());
        let inverted = ScoringConfig {
            rsi_long_min: 80.0,
            ..ScoringConfig::default()
        };
        assert!(inverted.validate().is_err());
        let negative = ScoringConfig {
            min_volume_ratio: -1.0,
            ..ScoringConfig::default()
        };
        assert!(negative.validate().is_err());
        let unreachable = ScoringConfig {
            min_required_score: 5,
            ..ScoringConfig::default()
        };
        assert!(unreachable.validate().is_err());
    }
}
