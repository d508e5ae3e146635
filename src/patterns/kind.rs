use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::Prediction;

/// Recognised candlestick formations, in detection priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    Hammer,
    ShootingStar,
    Doji,
    EngulfingBullish,
    EngulfingBearish,
}

impl PatternKind {
    #[allow(dead_code)]
    pub const ALL: [PatternKind; 5] = [
        PatternKind::Hammer,
        PatternKind::ShootingStar,
        PatternKind::Doji,
        PatternKind::EngulfingBullish,
        PatternKind::EngulfingBearish,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PatternKind::Hammer => "hammer",
            PatternKind::ShootingStar => "shooting_star",
            PatternKind::Doji => "doji",
            PatternKind::EngulfingBullish => "engulfing_bullish",
            PatternKind::EngulfingBearish => "engulfing_bearish",
        }
    }

    /// Directional reading of the formation. Doji carries none.
    pub fn bias(&self) -> Option<Prediction> {
        match self {
            PatternKind::Hammer | PatternKind::EngulfingBullish => Some(Prediction::Bullish),
            PatternKind::ShootingStar | PatternKind::EngulfingBearish => Some(Prediction::Bearish),
            PatternKind::Doji => None,
        }
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order() {
        let mut sorted = PatternKind::ALL;
        sorted.sort();
        assert_eq!(sorted, PatternKind::ALL);
        assert_eq!(PatternKind::ALL[0], PatternKind::Hammer);
        assert_eq!(PatternKind::ALL[4], PatternKind::EngulfingBearish);
    }

    #[test]
    fn test_bias() {
        assert_eq!(PatternKind::Hammer.bias(), Some(Prediction::Bullish));
        assert_eq!(PatternKind::EngulfingBullish.bias(), Some(Prediction::Bullish));
        assert_eq!(PatternKind::ShootingStar.bias(), Some(Prediction::Bearish));
        assert_eq!(PatternKind::EngulfingBearish.bias(), Some(Prediction::Bearish));
        assert_eq!(PatternKind::Doji.bias(), None);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&PatternKind::ShootingStar).unwrap();
        assert_eq!(json, "\"shooting_star\"");
        assert_eq!(PatternKind::EngulfingBearish.to_string(), "engulfing_bearish");
    }
}
