//! Position monitoring: re-evaluates open positions against fresh
//! snapshots and flags the ones whose trend has broken down.
//!
//! Closing is only signalled here; order placement belongs to the host.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use trendscore_core::domain::PositionSide;
use trendscore_core::signals::{evaluate_exit, InvalidationResult};

use crate::config::{ConfigError, ConfigFingerprint, ScreenerConfig};
use crate::data_loader::MarketDataSource;
use crate::screener::{ScreenError, Screener, SymbolFailure};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenPosition {
    pub symbol: String,
    pub side: PositionSide,
    pub entry_price: f64,
}

impl OpenPosition {
    pub fn new(symbol: impl Into<String>, side: PositionSide, entry_price: f64) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            entry_price,
        }
    }

    /// Unrealized PnL in percent of entry, positive when the position is
    /// in profit. 0 for a non-positive entry price.
    pub fn pnl_percent(&self, price: f64) -> f64 {
        if self.entry_price <= 0.0 {
            return 0.0;
        }
        self.side.sign() * (price - self.entry_price) / self.entry_price * 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitDecision {
    pub symbol: String,
    pub side: PositionSide,
    /// Last fast-timeframe close.
    pub price: f64,
    pub pnl_percent: f64,
    pub result: InvalidationResult,
}

impl ExitDecision {
    pub fn should_close(&self) -> bool {
        self.result.should_close
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorReport {
    pub config_fingerprint: ConfigFingerprint,
    /// One decision per position that could be evaluated, in input order.
    pub decisions: Vec<ExitDecision>,
    pub failures: Vec<SymbolFailure>,
}

impl MonitorReport {
    /// Decisions that call for closing the position.
    pub fn to_close(&self) -> impl Iterator<Item = &ExitDecision> {
        self.decisions.iter().filter(|d| d.should_close())
    }
}

impl Screener {
    /// Evaluate one open position.
    pub fn check_position(
        &self,
        source: &dyn MarketDataSource,
        position: &OpenPosition,
    ) -> Result<ExitDecision, ScreenError> {
        let (fast, slow) = self.snapshots(source, &position.symbol)?;
        let price = fast.price;
        let pnl_percent = position.pnl_percent(price);
        let result = evaluate_exit(
            &fast,
            &slow,
            price,
            position.side,
            pnl_percent,
            &self.config().exit,
        );
        if result.should_close {
            tracing::warn!(
                symbol = %position.symbol,
                side = %position.side,
                pnl_percent,
                signals = result.signal_count,
                reasons = ?result.reasons,
                "trend invalidated, position should close"
            );
        } else {
            tracing::debug!(
                symbol = %position.symbol,
                signals = result.signal_count,
                pnl_percent,
                "position holds"
            );
        }
        Ok(ExitDecision {
            symbol: position.symbol.clone(),
            side: position.side,
            price,
            pnl_percent,
            result,
        })
    }

    /// Run one monitoring cycle over the open positions.
    pub fn monitor(&self, source: &dyn MarketDataSource, positions: &[OpenPosition]) -> MonitorReport {
        let outcomes: Vec<Result<ExitDecision, ScreenError>> = positions
            .par_iter()
            .map(|position| self.check_position(source, position))
            .collect();

        let mut decisions = Vec::with_capacity(outcomes.len());
        let mut failures = Vec::new();
        for (position, outcome) in positions.iter().zip(outcomes) {
            match outcome {
                Ok(decision) => decisions.push(decision),
                Err(e) => {
                    tracing::warn!(symbol = %position.symbol, error = %e, "position not evaluated");
                    failures.push(SymbolFailure {
                        symbol: position.symbol.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            positions = positions.len(),
            to_close = decisions.iter().filter(|d| d.should_close()).count(),
            failed = failures.len(),
            "monitoring cycle complete"
        );

        MonitorReport {
            config_fingerprint: self.fingerprint().to_string(),
            decisions,
            failures,
        }
    }
}

/// One-shot monitoring cycle.
pub fn monitor_positions(
    source: &dyn MarketDataSource,
    positions: &[OpenPosition],
    config: &ScreenerConfig,
) -> Result<MonitorReport, ConfigError> {
    Ok(Screener::new(config.clone())?.monitor(source, positions))
}
