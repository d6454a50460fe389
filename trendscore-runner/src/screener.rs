//! Screening cycle: load, snapshot and score every symbol, then rank the
//! survivors.
//!
//! Symbols are evaluated in parallel with rayon. A symbol that fails to load
//! or carries malformed candles is recorded in the report and skipped; it
//! never aborts the cycle.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use thiserror::Error;

use trendscore_core::domain::Direction;
use trendscore_core::engine::{IndicatorEngine, IndicatorSnapshot};
use trendscore_core::signals::{score, ScoreResult};
use trendscore_core::IndicatorError;

use crate::config::{ConfigError, ConfigFingerprint, ScreenerConfig};
use crate::data_loader::{LoadError, MarketDataSource};

/// Why one symbol dropped out of a cycle.
#[derive(Debug, Error)]
pub enum ScreenError {
    #[error("{timeframe} data: {source}")]
    Load {
        timeframe: String,
        #[source]
        source: LoadError,
    },

    #[error("{timeframe} indicators: {source}")]
    Indicators {
        timeframe: String,
        #[source]
        source: IndicatorError,
    },
}

/// Per-symbol failure as recorded in a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolFailure {
    pub symbol: String,
    pub reason: String,
}

/// Everything computed for one symbol in one cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolEvaluation {
    pub symbol: String,
    pub fast: IndicatorSnapshot,
    pub slow: IndicatorSnapshot,
    pub score: ScoreResult,
}

/// A symbol that cleared every gate and reached the required score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub symbol: String,
    pub direction: Direction,
    /// Score of the winning side.
    pub score: u8,
    pub price: f64,
    pub volume_ratio: f64,
    pub atr_percent: f64,
}

impl Candidate {
    fn from_evaluation(eval: &SymbolEvaluation) -> Option<Self> {
        let score = match eval.score.direction {
            Direction::Long => eval.score.long_score,
            Direction::Short => eval.score.short_score,
            Direction::None => return None,
        };
        Some(Self {
            symbol: eval.symbol.clone(),
            direction: eval.score.direction,
            score,
            price: eval.fast.price,
            volume_ratio: eval.score.volume_ratio,
            atr_percent: eval.score.atr_percent,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenReport {
    /// Fingerprint of the config that produced this report.
    pub config_fingerprint: ConfigFingerprint,
    /// One entry per successfully evaluated symbol, in input order.
    pub evaluations: Vec<SymbolEvaluation>,
    /// Ranked, capped at `max_candidates`.
    pub candidates: Vec<Candidate>,
    pub failures: Vec<SymbolFailure>,
}

/// Best candidates first: higher score, then higher volume ratio, then
/// symbol name so ties are stable.
pub fn rank_candidates(candidates: &mut [Candidate]) {
    candidates.sort_by(compare_candidates);
}

pub fn compare_candidates(a: &Candidate, b: &Candidate) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| b.volume_ratio.total_cmp(&a.volume_ratio))
        .then_with(|| a.symbol.cmp(&b.symbol))
}

/// Validated config plus the engine built from it.
#[derive(Debug, Clone)]
pub struct Screener {
    config: ScreenerConfig,
    engine: IndicatorEngine,
    fingerprint: ConfigFingerprint,
}

impl Screener {
    pub fn new(config: ScreenerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let engine = IndicatorEngine::new(config.indicators.clone())?;
        let fingerprint = config.fingerprint();
        Ok(Self {
            config,
            engine,
            fingerprint,
        })
    }

    pub fn config(&self) -> &ScreenerConfig {
        &self.config
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Fresh fast and slow snapshots for one symbol.
    pub fn snapshots(
        &self,
        source: &dyn MarketDataSource,
        symbol: &str,
    ) -> Result<(IndicatorSnapshot, IndicatorSnapshot), ScreenError> {
        let fast = self.snapshot(source, symbol, &self.config.fast_timeframe)?;
        let slow = self.snapshot(source, symbol, &self.config.slow_timeframe)?;
        Ok((fast, slow))
    }

    fn snapshot(
        &self,
        source: &dyn MarketDataSource,
        symbol: &str,
        timeframe: &str,
    ) -> Result<IndicatorSnapshot, ScreenError> {
        let candles = source
            .candles(symbol, timeframe)
            .map_err(|source| ScreenError::Load {
                timeframe: timeframe.to_string(),
                source,
            })?;
        self.engine
            .compute(&candles)
            .map_err(|source| ScreenError::Indicators {
                timeframe: timeframe.to_string(),
                source,
            })
    }

    /// Snapshot and score one symbol.
    pub fn evaluate(
        &self,
        source: &dyn MarketDataSource,
        symbol: &str,
    ) -> Result<SymbolEvaluation, ScreenError> {
        let (fast, slow) = self.snapshots(source, symbol)?;
        let score = score(&fast, &slow, &self.config.scoring);
        tracing::debug!(
            symbol,
            direction = %score.direction,
            long_score = score.long_score,
            short_score = score.short_score,
            verdict = score.verdict.reason(),
            "scored"
        );
        Ok(SymbolEvaluation {
            symbol: symbol.to_string(),
            fast,
            slow,
            score,
        })
    }

    /// Run one screening cycle over `symbols`.
    pub fn screen(&self, source: &dyn MarketDataSource, symbols: &[&str]) -> ScreenReport {
        let outcomes: Vec<(&str, Result<SymbolEvaluation, ScreenError>)> = symbols
            .par_iter()
            .map(|&symbol| (symbol, self.evaluate(source, symbol)))
            .collect();

        let mut evaluations = Vec::with_capacity(outcomes.len());
        let mut failures = Vec::new();
        for (symbol, outcome) in outcomes {
            match outcome {
                Ok(eval) => evaluations.push(eval),
                Err(e) => {
                    tracing::warn!(symbol, error = %e, "symbol skipped");
                    failures.push(SymbolFailure {
                        symbol: symbol.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        let mut candidates: Vec<Candidate> = evaluations
            .iter()
            .filter_map(Candidate::from_evaluation)
            .collect();
        let qualified = candidates.len();
        rank_candidates(&mut candidates);
        candidates.truncate(self.config.max_candidates);

        tracing::info!(
            symbols = symbols.len(),
            evaluated = evaluations.len(),
            qualified,
            selected = candidates.len(),
            failed = failures.len(),
            fingerprint = %self.fingerprint,
            "screening cycle complete"
        );

        ScreenReport {
            config_fingerprint: self.fingerprint.clone(),
            evaluations,
            candidates,
            failures,
        }
    }
}

/// One-shot screening cycle.
pub fn screen(
    source: &dyn MarketDataSource,
    symbols: &[&str],
    config: &ScreenerConfig,
) -> Result<ScreenReport, ConfigError> {
    Ok(Screener::new(config.clone())?.screen(source, symbols))
}
