//! Hard gates applied before a score is allowed to produce a direction.

use serde::{Deserialize, Serialize};

/// Outcome of the entry gates. The first failing gate wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateVerdict {
    Passed,
    /// ATR as a percentage of price exceeds the allowed maximum.
    RejectedByVolatility,
    /// Volume ratio below the liquidity confirmation minimum.
    RejectedByVolume,
    /// Slow-timeframe ADX below the minimum trend strength.
    RejectedByTrendStrength,
}

impl GateVerdict {
    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    pub fn reason(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::RejectedByVolatility => "too volatile",
            Self::RejectedByVolume => "insufficient volume",
            Self::RejectedByTrendStrength => "trend too weak",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_is_passed() {
        assert!(GateVerdict::Passed.is_passed());
        assert!(!GateVerdict::RejectedByVolume.is_passed());
        assert!(!GateVerdict::RejectedByVolatility.is_passed());
        assert!(!GateVerdict::RejectedByTrendStrength.is_passed());
    }

    #[test]
    fn verdict_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&GateVerdict::RejectedByTrendStrength).unwrap(),
            "\"rejected_by_trend_strength\""
        );
        assert_eq!(GateVerdict::RejectedByVolume.reason(), "insufficient volume");
    }
}
