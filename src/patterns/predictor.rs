use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use super::{detect, group, PatternKind, PatternMatch, RepeatedPattern};
use crate::error::AnalysisError;
use crate::types::{last_n, validate_series, Candle, Prediction};

/// How many trailing fine candles momentum looks at. Only the newest one decides.
pub const MOMENTUM_LOOKBACK: usize = 5;

/// Which branch of the resolution order produced the prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", content = "kind", rename_all = "snake_case")]
pub enum Basis {
    RepeatedPattern(PatternKind),
    LatestPattern(PatternKind),
    Momentum,
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Basis::RepeatedPattern(kind) => write!(f, "repeated {}", kind),
            Basis::LatestPattern(kind) => write!(f, "latest {}", kind),
            Basis::Momentum => write!(f, "fine timeframe momentum"),
        }
    }
}

/// Result of one full analysis pass. Built from scratch on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub matches: Vec<PatternMatch>,
    pub repeated: Vec<RepeatedPattern>,
    pub momentum: Prediction,
    pub prediction: Prediction,
    pub basis: Basis,
}

impl Analysis {
    pub fn has_patterns(&self) -> bool {
        !self.matches.is_empty() || !self.repeated.is_empty()
    }
}

/// Direction of the most recent fine candle.
pub fn momentum(fine: &[Candle]) -> Result<Prediction, AnalysisError> {
    let recent = last_n(fine, MOMENTUM_LOOKBACK);
    let last = recent.last().ok_or_else(|| {
        AnalysisError::InsufficientData("momentum needs at least one fine candle".to_string())
    })?;

    Ok(if last.is_bullish() {
        Prediction::Bullish
    } else {
        Prediction::Bearish
    })
}

/// Picks the forecast: last repeated pattern, then last match, then momentum.
///
/// A doji has no direction, so when it is the candidate at either step the
/// next step is consulted instead.
pub fn resolve(
    repeated: &[RepeatedPattern],
    matches: &[PatternMatch],
    momentum: Prediction,
) -> (Prediction, Basis) {
    if let Some(last) = repeated.last() {
        if let Some(direction) = last.kind.bias() {
            return (direction, Basis::RepeatedPattern(last.kind));
        }
    }

    if let Some(last) = matches.last() {
        if let Some(direction) = last.kind.bias() {
            return (direction, Basis::LatestPattern(last.kind));
        }
    }

    (momentum, Basis::Momentum)
}

/// Runs detection and grouping over `coarse`, reads momentum off `fine`,
/// and resolves a single forecast for the next coarse candle.
pub fn analyze(fine: &[Candle], coarse: &[Candle]) -> Result<Analysis, AnalysisError> {
    let matches = detect(coarse)?;
    let repeated = group(&matches);

    validate_series(fine)?;
    let momentum = momentum(fine)?;

    let (prediction, basis) = resolve(&repeated, &matches, momentum);
    debug!(
        "Forecast {} from {} ({} matches, {} repeated)",
        prediction,
        basis,
        matches.len(),
        repeated.len()
    );

    Ok(Analysis {
        matches,
        repeated,
        momentum,
        prediction,
        basis,
    })
}

/// Forecast only, for callers that do not need the supporting matches.
#[allow(dead_code)]
pub fn predict(fine: &[Candle], coarse: &[Candle]) -> Result<Prediction, AnalysisError> {
    analyze(fine, coarse).map(|analysis| analysis.prediction)
}
