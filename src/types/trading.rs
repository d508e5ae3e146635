#![allow(dead_code)]
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TradingPair {
    BTCUSDT,
    ETHUSDT,
    SOLUSDT,
    BNBUSDT,
    ADAUSDT,
    XRPUSDT,
}

impl TradingPair {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradingPair::BTCUSDT => "BTCUSDT",
            TradingPair::ETHUSDT => "ETHUSDT",
            TradingPair::SOLUSDT => "SOLUSDT",
            TradingPair::BNBUSDT => "BNBUSDT",
            TradingPair::ADAUSDT => "ADAUSDT",
            TradingPair::XRPUSDT => "XRPUSDT",
        }
    }

    pub fn display_name(&self) -> String {
        format!("{}/USDT", self.base_asset())
    }

    pub fn base_asset(&self) -> &'static str {
        match self {
            TradingPair::BTCUSDT => "BTC",
            TradingPair::ETHUSDT => "ETH",
            TradingPair::SOLUSDT => "SOL",
            TradingPair::BNBUSDT => "BNB",
            TradingPair::ADAUSDT => "ADA",
            TradingPair::XRPUSDT => "XRP",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().replace('/', "").as_str() {
            "BTCUSDT" => Some(TradingPair::BTCUSDT),
            "ETHUSDT" => Some(TradingPair::ETHUSDT),
            "SOLUSDT" => Some(TradingPair::SOLUSDT),
            "BNBUSDT" => Some(TradingPair::BNBUSDT),
            "ADAUSDT" => Some(TradingPair::ADAUSDT),
            "XRPUSDT" => Some(TradingPair::XRPUSDT),
            _ => None,
        }
    }
}

impl fmt::Display for TradingPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeFrame {
    M1,   // 1 minute
    M5,   // 5 minutes
    M15,  // 15 minutes
    H1,   // 1 hour
    H4,   // 4 hours
    D1,   // 1 day
}

impl TimeFrame {
    /// Binance kline interval string.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFrame::M1 => "1m",
            TimeFrame::M5 => "5m",
            TimeFrame::M15 => "15m",
            TimeFrame::H1 => "1h",
            TimeFrame::H4 => "4h",
            TimeFrame::D1 => "1d",
        }
    }

    pub fn to_minutes(&self) -> u64 {
        match self {
            TimeFrame::M1 => 1,
            TimeFrame::M5 => 5,
            TimeFrame::M15 => 15,
            TimeFrame::H1 => 60,
            TimeFrame::H4 => 240,
            TimeFrame::D1 => 1440,
        }
    }

    pub fn to_milliseconds(&self) -> u64 {
        self.to_minutes() * 60 * 1000
    }

    /// Accepts both the enum spelling ("M5") and the interval spelling ("5m").
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim() {
            "M1" | "m1" | "1m" => Some(TimeFrame::M1),
            "M5" | "m5" | "5m" => Some(TimeFrame::M5),
            "M15" | "m15" | "15m" => Some(TimeFrame::M15),
            "H1" | "h1" | "1h" => Some(TimeFrame::H1),
            "H4" | "h4" | "4h" => Some(TimeFrame::H4),
            "D1" | "d1" | "1d" => Some(TimeFrame::D1),
            _ => None,
        }
    }
}

impl fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Direction forecast for the next candle. There is deliberately no neutral value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Prediction {
    Bullish,
    Bearish,
}

impl Prediction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Prediction::Bullish => "bullish",
            Prediction::Bearish => "bearish",
        }
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
