//! TrendScore Runner: screening and position-monitoring cycles.
//!
//! This crate builds on `trendscore-core` to provide:
//! - TOML configuration with content fingerprints
//! - A market data port with CSV-directory and in-memory sources
//! - Parallel screening cycles producing ranked entry candidates
//! - Parallel monitoring cycles flagging positions to close
//!
//! Logging goes through `tracing`; installing a subscriber is up to the
//! host binary.

pub mod config;
pub mod data_loader;
pub mod monitor;
pub mod screener;

pub use config::{ConfigError, ConfigFingerprint, ScreenerConfig};
pub use data_loader::{CsvDirectorySource, InMemorySource, LoadError, MarketDataSource};
pub use monitor::{monitor_positions, ExitDecision, MonitorReport, OpenPosition};
pub use screener::{
    rank_candidates, screen, Candidate, ScreenError, ScreenReport, Screener, SymbolEvaluation,
    SymbolFailure,
};
