//! Candle loading for the runner.
//!
//! The screener only sees the [`MarketDataSource`] trait. Two sources ship
//! with the crate:
//! - [`CsvDirectorySource`]: one CSV file per symbol and timeframe,
//!   `<root>/<SYMBOL>_<timeframe>.csv`
//! - [`InMemorySource`]: candles registered up front, for tests and
//!   embedding
//!
//! Loaders return candles oldest first and reject out-of-order histories.
//! Candle-level validation (finite prices, high/low ordering) stays in the
//! core.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use trendscore_core::domain::Candle;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no candles for '{symbol}' on {timeframe}")]
    NotFound { symbol: String, timeframe: String },

    #[error("read {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path} row {row}: unparseable timestamp '{value}'")]
    BadTimestamp {
        path: PathBuf,
        row: usize,
        value: String,
    },

    #[error("'{symbol}' candles out of order at index {index}")]
    OutOfOrder { symbol: String, index: usize },
}

/// Port through which the runner fetches candle history.
pub trait MarketDataSource: Send + Sync {
    /// Candles for one symbol and timeframe, oldest first.
    fn candles(&self, symbol: &str, timeframe: &str) -> Result<Vec<Candle>, LoadError>;
}

/// Reads `<root>/<SYMBOL>_<timeframe>.csv`.
///
/// Expected header: `timestamp,open,high,low,close,volume`. Timestamps are
/// RFC 3339 or integer unix seconds.
#[derive(Debug, Clone)]
pub struct CsvDirectorySource {
    root: PathBuf,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    timestamp: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

impl CsvDirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, symbol: &str, timeframe: &str) -> PathBuf {
        self.root.join(format!("{symbol}_{timeframe}.csv"))
    }
}

impl MarketDataSource for CsvDirectorySource {
    fn candles(&self, symbol: &str, timeframe: &str) -> Result<Vec<Candle>, LoadError> {
        let path = self.path_for(symbol, timeframe);
        if !path.is_file() {
            return Err(LoadError::NotFound {
                symbol: symbol.to_string(),
                timeframe: timeframe.to_string(),
            });
        }
        tracing::debug!(symbol, timeframe, path = %path.display(), "loading candles");

        let candles = read_csv(&path)?;
        check_order(symbol, &candles)?;
        Ok(candles)
    }
}

fn read_csv(path: &Path) -> Result<Vec<Candle>, LoadError> {
    let csv_err = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_err)?;

    let mut candles = Vec::new();
    for (row, result) in reader.deserialize().enumerate() {
        let record: CsvRow = result.map_err(csv_err)?;
        let timestamp =
            parse_timestamp(&record.timestamp).ok_or_else(|| LoadError::BadTimestamp {
                path: path.to_path_buf(),
                row: row + 1,
                value: record.timestamp.clone(),
            })?;
        candles.push(Candle {
            timestamp,
            open: record.open,
            high: record.high,
            low: record.low,
            close: record.close,
            volume: record.volume,
        });
    }
    Ok(candles)
}

/// RFC 3339 first, then integer unix seconds.
fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }
    value
        .parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
}

fn check_order(symbol: &str, candles: &[Candle]) -> Result<(), LoadError> {
    match candles
        .windows(2)
        .position(|w| w[1].timestamp <= w[0].timestamp)
    {
        Some(i) => Err(LoadError::OutOfOrder {
            symbol: symbol.to_string(),
            index: i + 1,
        }),
        None => Ok(()),
    }
}

/// Candles registered per (symbol, timeframe).
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    candles: HashMap<(String, String), Vec<Candle>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the history for one symbol and timeframe.
    pub fn insert(&mut self, symbol: &str, timeframe: &str, candles: Vec<Candle>) {
        self.candles
            .insert((symbol.to_string(), timeframe.to_string()), candles);
    }

    pub fn with(mut self, symbol: &str, timeframe: &str, candles: Vec<Candle>) -> Self {
        self.insert(symbol, timeframe, candles);
        self
    }
}

impl MarketDataSource for InMemorySource {
    fn candles(&self, symbol: &str, timeframe: &str) -> Result<Vec<Candle>, LoadError> {
        let candles = self
            .candles
            .get(&(symbol.to_string(), timeframe.to_string()))
            .ok_or_else(|| LoadError::NotFound {
                symbol: symbol.to_string(),
                timeframe: timeframe.to_string(),
            })?;
        check_order(symbol, candles)?;
        Ok(candles.clone())
    }
}
