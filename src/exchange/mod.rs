pub mod binance;

pub use binance::*;

use async_trait::async_trait;

use crate::error::FetchError;
use crate::types::{Candle, TimeFrame, TradingPair};

/// Source of closed OHLC candles, oldest first.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CandleSource: Send + Sync {
    async fn get_candles(
        &self,
        pair: TradingPair,
        timeframe: TimeFrame,
        limit: u32,
    ) -> Result<Vec<Candle>, FetchError>;
}

/// Fetches the fine and coarse series for one pair.
pub async fn get_multiple_timeframes<S: CandleSource + ?Sized>(
    source: &S,
    pair: TradingPair,
    fine: TimeFrame,
    coarse: TimeFrame,
    limit: u32,
) -> Result<(Vec<Candle>, Vec<Candle>), FetchError> {
    let fine_candles = source.get_candles(pair, fine, limit).await?;
    let coarse_candles = source.get_candles(pair, coarse, limit).await?;
    Ok((fine_candles, coarse_candles))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::candle::fixtures::series;
    use rust_decimal_macros::dec;

    #[test]
    fn test_fetches_fine_then_coarse() {
        let mut source = MockCandleSource::new();
        source
            .expect_get_candles()
            .withf(|pair, timeframe, limit| {
                *pair == TradingPair::ETHUSDT && *timeframe == TimeFrame::M1 && *limit == 120
            })
            .times(1)
            .returning(|_, _, _| Ok(series(&[(dec!(10), dec!(11), dec!(9), dec!(10.5))])));
        source
            .expect_get_candles()
            .withf(|_, timeframe, _| *timeframe == TimeFrame::M5)
            .times(1)
            .returning(|_, _, _| Ok(Vec::new()));

        let (fine, coarse) = tokio_test::block_on(get_multiple_timeframes(
            &source,
            TradingPair::ETHUSDT,
            TimeFrame::M1,
            TimeFrame::M5,
            120,
        ))
        .unwrap();

        assert_eq!(fine.len(), 1);
        assert!(coarse.is_empty());
    }

    #[test]
    fn test_stops_at_first_failure() {
        let mut source = MockCandleSource::new();
        source
            .expect_get_candles()
            .times(1)
            .returning(|_, _, _| Err(FetchError::Malformed("truncated body".to_string())));

        let result = tokio_test::block_on(get_multiple_timeframes(
            &source,
            TradingPair::BTCUSDT,
            TimeFrame::M1,
            TimeFrame::M5,
            200,
        ));
        assert!(matches!(result, Err(FetchError::Malformed(_))));
    }
}
