//! TrendScore Core: indicator engine, entry scoring, exit evaluation.
//!
//! This crate is the pure computational heart of the screener:
//! - Domain types (candles, validated candle series, sides and directions)
//! - Scalar and series helpers (SMA, EMA, Wilder smoothing)
//! - Indicators (EMA, MACD, RSI, ATR, ADX, Bollinger, Stochastic RSI,
//!   Supertrend, volume ratio)
//! - Indicator engine producing one flat snapshot per candle history
//! - Entry scoring with hard gates, and exit invalidation counting
//!
//! Nothing here performs I/O, reads the clock, or logs. Every entry point
//! is a deterministic function of its arguments.

pub mod domain;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod series;
pub mod signals;

pub use domain::{Candle, CandleSeries, Direction, PositionSide};
pub use engine::{compute_indicators, IndicatorEngine, IndicatorParams, IndicatorSnapshot};
pub use error::{CandleDefect, ConfigError, IndicatorError};
pub use signals::{
    evaluate_exit, score, ExitConfig, GateVerdict, InvalidationResult, ScoreResult, ScoringConfig,
};
