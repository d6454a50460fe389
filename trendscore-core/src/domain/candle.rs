//! Candle: the OHLCV unit produced by the market data source.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CandleDefect, IndicatorError};

/// One OHLCV candle. Sequences are ordered oldest first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// Check the OHLCV invariants: finite, non-negative, and the high/low
    /// envelope containing open and close.
    pub fn check(&self) -> Result<(), CandleDefect> {
        check_ohlcv(self.open, self.high, self.low, self.close, self.volume)
    }
}

fn check_ohlcv(
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
) -> Result<(), CandleDefect> {
    for (name, v) in [
        ("open", open),
        ("high", high),
        ("low", low),
        ("close", close),
        ("volume", volume),
    ] {
        if !v.is_finite() {
            return Err(CandleDefect::NotFinite { field: name, value: v });
        }
        if v < 0.0 {
            return Err(CandleDefect::Negative { field: name, value: v });
        }
    }
    if high < open.max(close) {
        return Err(CandleDefect::HighBelowBody { high });
    }
    if low > open.min(close) {
        return Err(CandleDefect::LowAboveBody { low });
    }
    Ok(())
}

/// Column-oriented view of a validated candle sequence.
///
/// All columns have the same, non-zero length. Indicators read from this
/// instead of the row form so that each recurrence walks a flat slice.
/// Opens are validated against the high/low envelope but not stored; no
/// indicator reads them.
#[derive(Debug, Clone, PartialEq)]
pub struct CandleSeries {
    high: Vec<f64>,
    low: Vec<f64>,
    close: Vec<f64>,
    volume: Vec<f64>,
    last_timestamp: Option<DateTime<Utc>>,
}

impl CandleSeries {
    /// Build from row candles, validating every bar.
    pub fn from_candles(candles: &[Candle]) -> Result<Self, IndicatorError> {
        if candles.is_empty() {
            return Err(IndicatorError::EmptySeries);
        }
        for (index, candle) in candles.iter().enumerate() {
            candle
                .check()
                .map_err(|reason| IndicatorError::InvalidCandle { index, reason })?;
        }
        Ok(Self {
            high: candles.iter().map(|c| c.high).collect(),
            low: candles.iter().map(|c| c.low).collect(),
            close: candles.iter().map(|c| c.close).collect(),
            volume: candles.iter().map(|c| c.volume).collect(),
            last_timestamp: candles.last().map(|c| c.timestamp),
        })
    }

    /// Build from parallel columns. Every column must match `close` in length.
    pub fn from_columns(
        open: Vec<f64>,
        high: Vec<f64>,
        low: Vec<f64>,
        close: Vec<f64>,
        volume: Vec<f64>,
    ) -> Result<Self, IndicatorError> {
        let expected = close.len();
        if expected == 0 {
            return Err(IndicatorError::EmptySeries);
        }
        for (column, len) in [
            ("open", open.len()),
            ("high", high.len()),
            ("low", low.len()),
            ("volume", volume.len()),
        ] {
            if len != expected {
                return Err(IndicatorError::LengthMismatch {
                    column,
                    expected,
                    actual: len,
                });
            }
        }
        for index in 0..expected {
            check_ohlcv(open[index], high[index], low[index], close[index], volume[index])
                .map_err(|reason| IndicatorError::InvalidCandle { index, reason })?;
        }
        Ok(Self {
            high,
            low,
            close,
            volume,
            last_timestamp: None,
        })
    }

    pub fn len(&self) -> usize {
        self.close.len()
    }

    /// Always false for a constructed series; kept for clippy's `len` pairing.
    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }

    pub fn high(&self) -> &[f64] {
        &self.high
    }

    pub fn low(&self) -> &[f64] {
        &self.low
    }

    pub fn close(&self) -> &[f64] {
        &self.close
    }

    pub fn volume(&self) -> &[f64] {
        &self.volume
    }

    /// Midpoint of the high/low range at `index`.
    pub fn hl2(&self, index: usize) -> f64 {
        (self.high[index] + self.low[index]) / 2.0
    }

    /// Close of the most recent candle.
    pub fn last_close(&self) -> f64 {
        self.close[self.close.len() - 1]
    }

    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.last_timestamp
    }
}
