//! Directional enums shared by the scorer and the exit evaluator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Side of an open position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionSide {
    Long,
    Short,
}

impl PositionSide {
    /// +1 for long, -1 for short. Multiplies price moves into PnL.
    pub fn sign(self) -> f64 {
        match self {
            Self::Long => 1.0,
            Self::Short => -1.0,
        }
    }
}

impl fmt::Display for PositionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Long => write!(f, "LONG"),
            Self::Short => write!(f, "SHORT"),
        }
    }
}

/// Entry direction produced by scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Long,
    Short,
    #[default]
    None,
}

impl Direction {
    /// The position side this direction would open, if any.
    pub fn side(self) -> Option<PositionSide> {
        match self {
            Self::Long => Some(PositionSide::Long),
            Self::Short => Some(PositionSide::Short),
            Self::None => None,
        }
    }

    pub fn is_actionable(self) -> bool {
        self != Self::None
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Long => write!(f, "LONG"),
            Self::Short => write!(f, "SHORT"),
            Self::None => write!(f, "NONE"),
        }
    }
}
