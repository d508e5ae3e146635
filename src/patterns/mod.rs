//! Candlestick pattern engine: detection, repeat tracking, and next-candle forecast.

pub mod kind;
pub mod detector;
pub mod tracker;
pub mod predictor;

pub use kind::*;
pub use detector::{detect, PatternMatch};
pub use tracker::{group, RepeatedPattern};
pub use predictor::{analyze, Analysis, Basis};
