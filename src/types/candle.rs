use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{TimeFrame, TradingPair};
use crate::error::AnalysisError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub pair: TradingPair,
    pub timeframe: TimeFrame,
    pub open_time: DateTime<Utc>,
    pub close_time: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
    pub quote_volume: Decimal,
    pub trades: u64,
}

impl Candle {
    pub fn body_size(&self) -> Decimal {
        (self.close - self.open).abs()
    }

    pub fn range(&self) -> Decimal {
        self.high - self.low
    }

    pub fn upper_wick(&self) -> Decimal {
        self.high - self.close.max(self.open)
    }

    pub fn lower_wick(&self) -> Decimal {
        self.close.min(self.open) - self.low
    }

    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// Checks the price invariant every pattern rule relies on.
    ///
    /// Also rejects prices so large that the rules' arithmetic would overflow.
    /// Body and wicks never exceed the range, so bounding twice the range
    /// bounds every product the rules compute.
    pub fn validate(&self, index: usize) -> Result<(), AnalysisError> {
        let reason = if self.high < self.open.max(self.close) {
            Some(format!(
                "high {} is below max(open {}, close {})",
                self.high, self.open, self.close
            ))
        } else if self.low > self.open.min(self.close) {
            Some(format!(
                "low {} is above min(open {}, close {})",
                self.low, self.open, self.close
            ))
        } else if self
            .high
            .checked_sub(self.low)
            .and_then(|range| range.checked_mul(Decimal::TWO))
            .is_none()
        {
            Some(format!(
                "range between high {} and low {} is out of bounds",
                self.high, self.low
            ))
        } else {
            None
        };

        match reason {
            Some(reason) => Err(AnalysisError::InvalidCandle { index, reason }),
            None => Ok(()),
        }
    }
}

/// Validates every candle and the strict open-time ordering of a series.
pub fn validate_series(series: &[Candle]) -> Result<(), AnalysisError> {
    for (index, candle) in series.iter().enumerate() {
        candle.validate(index)?;
        if index > 0 && candle.open_time <= series[index - 1].open_time {
            return Err(AnalysisError::UnorderedSeries { index });
        }
    }
    Ok(())
}

/// Returns at most the last `n` candles of a series.
pub fn last_n(series: &[Candle], n: usize) -> &[Candle] {
    let len = series.len();
    if n >= len {
        series
    } else {
        &series[len - n..]
    }
}
