use thiserror::Error;

/// Errors raised by the pattern engine on malformed input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// Candle prices violate `high >= max(open, close)` / `low <= min(open, close)`,
    /// or span a range too large for the pattern arithmetic.
    #[error("invalid candle at index {index}: {reason}")]
    InvalidCandle { index: usize, reason: String },

    /// Open times are not strictly increasing.
    #[error("series is not ordered by open time at index {index}")]
    UnorderedSeries { index: usize },

    #[error("insufficient data: {0}")]
    InsufficientData(String),
}

/// Errors from the market data client.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transient(#[from] reqwest::Error),

    #[error("exchange returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("malformed market data: {0}")]
    Malformed(String),
}

impl FetchError {
    /// Whether retrying the same request later may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Transient(_) => true,
            // 418 is Binance's IP ban after ignored 429s
            FetchError::Api { status, .. } => *status == 418 || *status == 429 || *status >= 500,
            FetchError::Malformed(_) => false,
        }
    }
}

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}
