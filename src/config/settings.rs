use serde::{Deserialize, Serialize};

use crate::exchange::{BINANCE_API, MAX_KLINES_PER_REQUEST};
use crate::types::{TimeFrame, TradingPair};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub pair: TradingPair,
    /// Timeframe momentum is read from.
    pub fine_timeframe: TimeFrame,
    /// Timeframe patterns are detected on and forecast for.
    pub coarse_timeframe: TimeFrame,
    /// Candles fetched per timeframe.
    pub candle_limit: u32,
    pub refresh_interval_secs: u64,
    pub api_base_url: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            pair: TradingPair::BTCUSDT,
            fine_timeframe: TimeFrame::M1,
            coarse_timeframe: TimeFrame::M5,
            candle_limit: 200,
            refresh_interval_secs: 30,
            api_base_url: BINANCE_API.to_string(),
        }
    }
}

impl AnalyzerConfig {
    pub const MIN_REFRESH_SECS: u64 = 5;
    pub const MAX_REFRESH_SECS: u64 = 60;

    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.fine_timeframe.to_minutes() >= self.coarse_timeframe.to_minutes() {
            errors.push(format!(
                "fine_timeframe ({}) must be shorter than coarse_timeframe ({})",
                self.fine_timeframe, self.coarse_timeframe
            ));
        }
        // two-candle rules need a predecessor
        if self.candle_limit < 2 || self.candle_limit > MAX_KLINES_PER_REQUEST {
            errors.push(format!(
                "candle_limit must be between 2 and {}",
                MAX_KLINES_PER_REQUEST
            ));
        }
        if !(Self::MIN_REFRESH_SECS..=Self::MAX_REFRESH_SECS).contains(&self.refresh_interval_secs) {
            errors.push(format!(
                "refresh_interval_secs must be between {} and {}",
                Self::MIN_REFRESH_SECS,
                Self::MAX_REFRESH_SECS
            ));
        }
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            errors.push("api_base_url must be an http(s) URL".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
