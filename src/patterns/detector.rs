//! Candlestick formation rules.
//!
//! Every rule compares signs or ratios of price differences, so a verdict is
//! unchanged when all prices of a series are multiplied by the same positive
//! factor. The thresholds below are fixed.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::PatternKind;
use crate::error::AnalysisError;
use crate::types::{validate_series, Candle};

/// Minimum shadow length, as a multiple of the body, for hammer and shooting star.
pub const SHADOW_TO_BODY_RATIO: Decimal = dec!(2);

/// Maximum body size, as a fraction of the high-low range, for a doji.
pub const DOJI_BODY_RATIO: Decimal = dec!(0.1);

/// One detected formation. Two-candle formations are indexed by the later candle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PatternMatch {
    pub kind: PatternKind,
    pub index: usize,
}

impl PatternMatch {
    pub fn new(kind: PatternKind, index: usize) -> Self {
        Self { kind, index }
    }
}

#[derive(Clone, Copy)]
enum Rule {
    Single(fn(&Candle) -> bool),
    Pair(fn(&Candle, &Candle) -> bool),
}

impl Rule {
    fn matches(&self, prev: &Candle, curr: &Candle) -> bool {
        match self {
            Rule::Single(rule) => rule(curr),
            Rule::Pair(rule) => rule(prev, curr),
        }
    }
}

// Evaluation order here is the order matches are reported for a given index.
const RULES: [(PatternKind, Rule); 5] = [
    (PatternKind::Hammer, Rule::Single(is_hammer)),
    (PatternKind::ShootingStar, Rule::Single(is_shooting_star)),
    (PatternKind::Doji, Rule::Single(is_doji)),
    (PatternKind::EngulfingBullish, Rule::Pair(is_engulfing_bullish)),
    (PatternKind::EngulfingBearish, Rule::Pair(is_engulfing_bearish)),
];

pub fn is_hammer(candle: &Candle) -> bool {
    let body = candle.body_size();
    candle.lower_wick() > SHADOW_TO_BODY_RATIO * body
        && candle.upper_wick() < body
        && candle.is_bullish()
}

pub fn is_shooting_star(candle: &Candle) -> bool {
    let body = candle.body_size();
    candle.upper_wick() > SHADOW_TO_BODY_RATIO * body
        && candle.lower_wick() < body
        && candle.is_bearish()
}

pub fn is_doji(candle: &Candle) -> bool {
    candle.body_size() <= DOJI_BODY_RATIO * candle.range()
}

pub fn is_engulfing_bullish(prev: &Candle, curr: &Candle) -> bool {
    prev.close < prev.open && curr.open < prev.close && curr.close > prev.open
}

pub fn is_engulfing_bearish(prev: &Candle, curr: &Candle) -> bool {
    prev.close > prev.open && curr.open > prev.close && curr.close < prev.open
}

/// Scans a series for every known formation.
///
/// Matches are ordered by candle index, then by [`PatternKind`] priority.
/// Scanning starts at index 1 so that every candle examined has a
/// predecessor; a series shorter than two candles yields no matches.
pub fn detect(series: &[Candle]) -> Result<Vec<PatternMatch>, AnalysisError> {
    validate_series(series)?;

    let mut matches = Vec::new();
    for (offset, window) in series.windows(2).enumerate() {
        let index = offset + 1;
        let (prev, curr) = (&window[0], &window[1]);

        for (kind, rule) in RULES.iter() {
            if rule.matches(prev, curr) {
                matches.push(PatternMatch::new(*kind, index));
            }
        }
    }

    debug!("Detected {} patterns over {} candles", matches.len(), series.len());
    Ok(matches)
}
