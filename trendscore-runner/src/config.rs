//! Serializable screener configuration.
//!
//! One TOML file carries every threshold the core consumes, plus the two
//! timeframes and the candidate cap:
//!
//! ```toml
//! fast_timeframe = "15m"
//! slow_timeframe = "4h"
//! max_candidates = 5
//!
//! [scoring]
//! min_volume_ratio = 1.2
//!
//! [exit]
//! invalidation_min_pnl_threshold = -2.0
//! ```
//!
//! Missing keys take their defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use trendscore_core::engine::IndicatorParams;
use trendscore_core::signals::{ExitConfig, ScoringConfig};

/// Content hash of a configuration (hex BLAKE3).
pub type ConfigFingerprint = String;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid indicator parameters: {0}")]
    Indicators(#[from] trendscore_core::IndicatorError),

    #[error("invalid thresholds: {0}")]
    Thresholds(#[from] trendscore_core::ConfigError),

    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenerConfig {
    /// Entry timeframe (scored criteria, volume, volatility).
    pub fast_timeframe: String,
    /// Trend timeframe (EMA ordering and ADX).
    pub slow_timeframe: String,
    /// Upper bound on candidates handed to the decision step per cycle.
    pub max_candidates: usize,
    pub indicators: IndicatorParams,
    pub scoring: ScoringConfig,
    pub exit: ExitConfig,
}

impl Default for ScreenerConfig {
    fn default() -> Self {
        Self {
            fast_timeframe: "15m".to_string(),
            slow_timeframe: "4h".to_string(),
            max_candidates: 5,
            indicators: IndicatorParams::default(),
            scoring: ScoringConfig::default(),
            exit: ExitConfig::default(),
        }
    }
}

impl ScreenerConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("fast_timeframe", &self.fast_timeframe),
            ("slow_timeframe", &self.slow_timeframe),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must not be empty".to_string(),
                });
            }
        }
        if self.max_candidates == 0 {
            return Err(ConfigError::Invalid {
                field: "max_candidates",
                reason: "must be >= 1".to_string(),
            });
        }
        self.indicators.validate()?;
        self.scoring.validate()?;
        self.exit.validate()?;
        Ok(())
    }

    /// Deterministic hash of the full configuration.
    ///
    /// Two configs with identical values share a fingerprint, so every
    /// report can be traced back to the exact thresholds that produced it.
    pub fn fingerprint(&self) -> ConfigFingerprint {
        // Plain structs of numbers and strings: serialization cannot fail.
        let json = serde_json::to_string(self).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}
