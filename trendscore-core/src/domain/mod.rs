//! Domain types for TrendScore.

pub mod candle;
pub mod side;

pub use candle::{Candle, CandleSeries};
pub use side::{Direction, PositionSide};
