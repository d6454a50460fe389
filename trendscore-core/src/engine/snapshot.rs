//! Indicator snapshot: the latest value of every indicator for one
//! symbol × timeframe × evaluation instant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Trailing values per indicator, keyed by snapshot field name.
///
/// `BTreeMap` keeps key order deterministic when the snapshot is serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrailingSeries {
    series: BTreeMap<String, Vec<f64>>,
}

impl TrailingSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the last `len` values of `values` under `name`.
    pub fn insert_tail(&mut self, name: impl Into<String>, values: &[f64], len: usize) {
        let start = values.len().saturating_sub(len);
        self.series.insert(name.into(), values[start..].to_vec());
    }

    /// Trailing values for a named indicator, oldest first.
    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.series.get(name).map(|v| v.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Flat record of the latest indicator values.
///
/// Built fresh by every engine call and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    /// Timestamp of the last candle, when the input carried timestamps.
    pub timestamp: Option<DateTime<Utc>>,
    /// Close of the last candle.
    pub price: f64,

    pub ema20: f64,
    pub ema50: f64,

    pub macd: f64,
    pub macd_signal: f64,
    pub macd_histogram: f64,
    pub macd_histogram_rising: bool,

    pub rsi7: f64,
    pub rsi14: f64,

    pub atr3: f64,
    pub atr14: f64,

    pub adx: f64,
    pub plus_di: f64,
    pub minus_di: f64,

    pub bb_upper: f64,
    pub bb_middle: f64,
    pub bb_lower: f64,
    pub bb_percent_b: f64,

    pub volume: f64,
    pub volume_ma: f64,
    pub volume_ratio: f64,

    pub stoch_rsi_k: f64,
    pub stoch_rsi_d: f64,

    pub supertrend_value: f64,
    /// +1 while trending up, -1 while trending down.
    pub supertrend_trend: i8,

    pub series: Option<TrailingSeries>,
}

impl IndicatorSnapshot {
    /// EMA20 above EMA50.
    pub fn is_uptrend(&self) -> bool {
        self.ema20 > self.ema50
    }

    /// EMA20 below EMA50.
    pub fn is_downtrend(&self) -> bool {
        self.ema20 < self.ema50
    }

    /// ATR14 as a percentage of `price`; 0 for a non-positive price.
    pub fn atr_percent(&self, price: f64) -> f64 {
        if price > 0.0 {
            self.atr14 / price * 100.0
        } else {
            0.0
        }
    }

    /// Absolute distance of `price` from EMA20, in percent of EMA20.
    /// `None` when EMA20 is not positive.
    pub fn ema20_distance_percent(&self, price: f64) -> Option<f64> {
        (self.ema20 > 0.0).then(|| (price - self.ema20).abs() / self.ema20 * 100.0)
    }
}
