use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

use super::CandleSource;
use crate::error::FetchError;
use crate::types::{Candle, TimeFrame, TradingPair};

pub const BINANCE_API: &str = "https://api.binance.com";

/// Binance limits klines to 1000 per request.
pub const MAX_KLINES_PER_REQUEST: u32 = 1000;

/// A stalled request fails as a transient error after this long.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct BinanceClient {
    client: Client,
    base_url: String,
}

impl BinanceClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Latest `limit` klines, oldest first. The last one may still be forming.
    pub async fn get_candles(
        &self,
        pair: TradingPair,
        timeframe: TimeFrame,
        limit: u32,
    ) -> Result<Vec<Candle>, FetchError> {
        let url = format!(
            "{}/api/v3/klines?symbol={}&interval={}&limit={}",
            self.base_url,
            pair.as_str(),
            timeframe.as_str(),
            limit.min(MAX_KLINES_PER_REQUEST)
        );

        debug!("GET {}", url);
        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(FetchError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let candles = parse_klines(&body, pair, timeframe)?;
        debug!("Fetched {} {} candles for {}", candles.len(), timeframe, pair);
        Ok(candles)
    }
}

#[async_trait]
impl CandleSource for BinanceClient {
    async fn get_candles(
        &self,
        pair: TradingPair,
        timeframe: TimeFrame,
        limit: u32,
    ) -> Result<Vec<Candle>, FetchError> {
        BinanceClient::get_candles(self, pair, timeframe, limit).await
    }
}

/// Parses a `/api/v3/klines` response body.
///
/// Each row is `[openTime, open, high, low, close, volume, closeTime,
/// quoteVolume, trades, ...]` with prices as decimal strings.
pub fn parse_klines(
    body: &str,
    pair: TradingPair,
    timeframe: TimeFrame,
) -> Result<Vec<Candle>, FetchError> {
    let rows: Vec<Vec<Value>> = serde_json::from_str(body)
        .map_err(|e| FetchError::Malformed(format!("unexpected kline payload: {}", e)))?;

    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            parse_kline_row(row, pair, timeframe)
                .map_err(|reason| FetchError::Malformed(format!("kline {}: {}", i, reason)))
        })
        .collect()
}

fn parse_kline_row(row: &[Value], pair: TradingPair, timeframe: TimeFrame) -> Result<Candle, String> {
    Ok(Candle {
        pair,
        timeframe,
        open_time: timestamp_field(row, 0, "open time")?,
        open: decimal_field(row, 1, "open")?,
        high: decimal_field(row, 2, "high")?,
        low: decimal_field(row, 3, "low")?,
        close: decimal_field(row, 4, "close")?,
        volume: decimal_field(row, 5, "volume")?,
        close_time: timestamp_field(row, 6, "close time")?,
        quote_volume: decimal_field(row, 7, "quote volume")?,
        trades: row.get(8).and_then(|v| v.as_u64()).unwrap_or(0),
    })
}

fn decimal_field(row: &[Value], idx: usize, name: &str) -> Result<Decimal, String> {
    let raw = row
        .get(idx)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("missing {}", name))?;
    Decimal::from_str(raw).map_err(|e| format!("invalid {} {:?}: {}", name, raw, e))
}

fn timestamp_field(row: &[Value], idx: usize, name: &str) -> Result<DateTime<Utc>, String> {
    let millis = row
        .get(idx)
        .and_then(|v| v.as_i64())
        .ok_or_else(|| format!("missing {}", name))?;
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| format!("{} out of range: {}", name, millis))
}
