//! Indicator engine: one candle history in, one [`IndicatorSnapshot`] out.
//!
//! The engine owns validated indicator instances and runs each of them over
//! the full history on every call. Nothing is cached between calls: the
//! same candles always yield a bit-identical snapshot.

pub mod params;
pub mod snapshot;

pub use params::IndicatorParams;
pub use snapshot::{IndicatorSnapshot, TrailingSeries};

use crate::domain::{Candle, CandleSeries};
use crate::error::IndicatorError;
use crate::indicators::{
    last, Adx, Atr, Bollinger, Ema, Indicator, Macd, Rsi, StochRsi, Supertrend, VolumeRatio,
};
use params::{
    ATR_FAST_PERIOD, ATR_SLOW_PERIOD, EMA_FAST_PERIOD, EMA_SLOW_PERIOD, RSI_FAST_PERIOD,
    RSI_SLOW_PERIOD,
};

/// Compute a snapshot with the default parameters.
pub fn compute_indicators(candles: &[Candle]) -> Result<IndicatorSnapshot, IndicatorError> {
    IndicatorEngine::new(IndicatorParams::default())?.compute(candles)
}

#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    params: IndicatorParams,
    ema20: Ema,
    ema50: Ema,
    macd: Macd,
    rsi7: Rsi,
    rsi14: Rsi,
    atr3: Atr,
    atr14: Atr,
    adx: Adx,
    bollinger: Bollinger,
    stoch_rsi: StochRsi,
    supertrend: Supertrend,
    volume: VolumeRatio,
}

impl IndicatorEngine {
    pub fn new(params: IndicatorParams) -> Result<Self, IndicatorError> {
        params.validate()?;
        Ok(Self {
            ema20: Ema::new(EMA_FAST_PERIOD)?,
            ema50: Ema::new(EMA_SLOW_PERIOD)?,
            macd: Macd::new(params.macd_fast, params.macd_slow, params.macd_signal)?,
            rsi7: Rsi::new(RSI_FAST_PERIOD)?,
            rsi14: Rsi::new(RSI_SLOW_PERIOD)?,
            atr3: Atr::new(ATR_FAST_PERIOD)?,
            atr14: Atr::new(ATR_SLOW_PERIOD)?,
            adx: Adx::new(params.adx_period)?,
            bollinger: Bollinger::new(params.bollinger_period, params.bollinger_multiplier)?,
            stoch_rsi: StochRsi::new(params.stoch_rsi_period, params.stoch_period)?,
            supertrend: Supertrend::new(params.supertrend_period, params.supertrend_multiplier)?,
            volume: VolumeRatio::new(params.volume_ma_period)?,
            params,
        })
    }

    pub fn params(&self) -> &IndicatorParams {
        &self.params
    }

    /// Bars needed before every indicator has left its short-history
    /// fallback.
    pub fn warmup_bars(&self) -> usize {
        [
            self.ema50.lookback(),
            self.macd.lookback(),
            self.rsi14.lookback(),
            self.atr14.lookback(),
            self.adx.lookback(),
            self.bollinger.lookback(),
            self.stoch_rsi.lookback(),
            self.supertrend.lookback(),
            self.volume.lookback(),
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
            + 1
    }

    /// Validate the candles and compute the snapshot.
    pub fn compute(&self, candles: &[Candle]) -> Result<IndicatorSnapshot, IndicatorError> {
        let series = CandleSeries::from_candles(candles)?;
        Ok(self.compute_series(&series))
    }

    /// Compute the snapshot from an already validated series.
    pub fn compute_series(&self, series: &CandleSeries) -> IndicatorSnapshot {
        let ema20 = self.ema20.compute(series);
        let ema50 = self.ema50.compute(series);
        let macd = self.macd.compute(series);
        let rsi7 = self.rsi7.compute(series);
        let rsi14 = self.rsi14.compute(series);
        let atr3 = self.atr3.compute(series);
        let atr14 = self.atr14.compute(series);
        let adx = self.adx.compute(series);
        let bb = self.bollinger.compute(series);
        let stoch = self.stoch_rsi.compute(series);
        let st = self.supertrend.compute(series);
        let vol = self.volume.compute(series);

        let trailing = (self.params.trailing_len > 0).then(|| {
            let len = self.params.trailing_len;
            let trend: Vec<f64> = st.trend.iter().map(|t| f64::from(t.as_i8())).collect();
            let mut ts = TrailingSeries::new();
            for (name, values) in [
                ("price", series.close()),
                ("ema20", ema20.as_slice()),
                ("ema50", ema50.as_slice()),
                ("macd", macd.macd.as_slice()),
                ("macd_signal", macd.signal.as_slice()),
                ("macd_histogram", macd.histogram.as_slice()),
                ("rsi7", rsi7.as_slice()),
                ("rsi14", rsi14.as_slice()),
                ("atr3", atr3.as_slice()),
                ("atr14", atr14.as_slice()),
                ("adx", adx.adx.as_slice()),
                ("plus_di", adx.plus_di.as_slice()),
                ("minus_di", adx.minus_di.as_slice()),
                ("bb_upper", bb.upper.as_slice()),
                ("bb_middle", bb.middle.as_slice()),
                ("bb_lower", bb.lower.as_slice()),
                ("bb_percent_b", bb.percent_b.as_slice()),
                ("volume", series.volume()),
                ("volume_ma", vol.average.as_slice()),
                ("volume_ratio", vol.ratio.as_slice()),
                ("stoch_rsi_k", stoch.k.as_slice()),
                ("stoch_rsi_d", stoch.d.as_slice()),
                ("supertrend_value", st.value.as_slice()),
                ("supertrend_trend", trend.as_slice()),
            ] {
                ts.insert_tail(name, values, len);
            }
            ts
        });

        IndicatorSnapshot {
            timestamp: series.last_timestamp(),
            price: series.last_close(),
            ema20: last(&ema20),
            ema50: last(&ema50),
            macd: macd.latest_macd(),
            macd_signal: macd.latest_signal(),
            macd_histogram: macd.latest_histogram(),
            macd_histogram_rising: macd.histogram_rising(),
            rsi7: last(&rsi7),
            rsi14: last(&rsi14),
            atr3: last(&atr3),
            atr14: last(&atr14),
            adx: last(&adx.adx),
            plus_di: last(&adx.plus_di),
            minus_di: last(&adx.minus_di),
            bb_upper: last(&bb.upper),
            bb_middle: last(&bb.middle),
            bb_lower: last(&bb.lower),
            bb_percent_b: last(&bb.percent_b),
            volume: last(series.volume()),
            volume_ma: last(&vol.average),
            volume_ratio: last(&vol.ratio),
            stoch_rsi_k: last(&stoch.k),
            stoch_rsi_d: last(&stoch.d),
            supertrend_value: st.latest_value(),
            supertrend_trend: st.latest_trend().as_i8(),
            series: trailing,
        }
    }
}
