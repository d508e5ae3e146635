use chrono::{DateTime, Utc};
use std::future::Future;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use crate::config::AnalyzerConfig;
use crate::error::MonitorError;
use crate::exchange::{get_multiple_timeframes, CandleSource};
use crate::patterns::{analyze, Analysis};
use crate::report::{print_forecast, ForecastReport, OutputFormat};

#[derive(Debug, Clone, Default)]
pub struct MonitorStats {
    pub refreshes: u64,
    pub failures: u64,
    pub last_success: Option<DateTime<Utc>>,
}

/// Fetches both timeframes and re-runs the full analysis on demand or on a timer.
///
/// The last successful analysis is only replaced once a refresh has fully
/// succeeded, so a failed cycle never leaves a partial result behind.
pub struct PatternMonitor<S: CandleSource> {
    source: S,
    config: AnalyzerConfig,
    last: Option<Analysis>,
    stats: MonitorStats,
}

impl<S: CandleSource> PatternMonitor<S> {
    pub fn new(source: S, config: AnalyzerConfig) -> Self {
        Self {
            source,
            config,
            last: None,
            stats: MonitorStats::default(),
        }
    }

    pub fn last_analysis(&self) -> Option<&Analysis> {
        self.last.as_ref()
    }

    pub fn stats(&self) -> &MonitorStats {
        &self.stats
    }

    pub async fn refresh(&mut self) -> Result<&Analysis, MonitorError> {
        self.stats.refreshes += 1;

        match self.compute().await {
            Ok(analysis) => {
                self.stats.last_success = Some(Utc::now());
                Ok(&*self.last.insert(analysis))
            }
            Err(e) => {
                self.stats.failures += 1;
                Err(e)
            }
        }
    }

    async fn compute(&self) -> Result<Analysis, MonitorError> {
        let (fine, coarse) = get_multiple_timeframes(
            &self.source,
            self.config.pair,
            self.config.fine_timeframe,
            self.config.coarse_timeframe,
            self.config.candle_limit,
        )
        .await?;

        Ok(analyze(&fine, &coarse)?)
    }

    pub fn forecast_report<'a>(&'a self, analysis: &'a Analysis) -> ForecastReport<'a> {
        ForecastReport {
            pair: self.config.pair,
            fine_timeframe: self.config.fine_timeframe,
            coarse_timeframe: self.config.coarse_timeframe,
            generated_at: Utc::now(),
            analysis,
        }
    }

    /// Refreshes every `interval` until Ctrl+C, printing each new forecast.
    pub async fn run(&mut self, interval: Duration, format: OutputFormat) -> anyhow::Result<()> {
        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
        };
        self.run_until(interval, format, shutdown).await
    }

    /// Refreshes every `interval` until `shutdown` resolves.
    ///
    /// `shutdown` is polled for the whole run, including while a refresh is
    /// in flight, so a stop request is never lost to a slow fetch.
    pub async fn run_until<F>(
        &mut self,
        interval: Duration,
        format: OutputFormat,
        shutdown: F,
    ) -> anyhow::Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            "Monitoring {} ({} momentum, {} patterns) every {}s",
            self.config.pair,
            self.config.fine_timeframe,
            self.config.coarse_timeframe,
            interval.as_secs()
        );
        info!("Press Ctrl+C to stop");

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = &mut shutdown => break,
            }

            let outcome = tokio::select! {
                outcome = self.refresh() => outcome.map(|analysis| analysis.prediction),
                _ = &mut shutdown => {
                    warn!("Refresh interrupted by shutdown");
                    break;
                }
            };

            match outcome {
                Ok(prediction) => {
                    info!("Forecast for next {} candle: {}", self.config.coarse_timeframe, prediction);
                    if let Some(analysis) = self.last_analysis() {
                        print_forecast(&self.forecast_report(analysis), format)?;
                    }
                }
                Err(MonitorError::Fetch(e)) if e.is_transient() => {
                    warn!("Market data unavailable, retrying next cycle: {}", e);
                }
                Err(e) => {
                    error!("Refresh failed: {}", e);
                }
            }
        }

        let stats = self.stats();
        info!(
            "Shutting down after {} refreshes ({} failed, last success {})",
            stats.refreshes,
            stats.failures,
            stats
                .last_success
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| "never".to_string())
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AnalysisError, FetchError};
    use crate::exchange::MockCandleSource;
    use crate::types::candle::fixtures::series;
    use crate::types::{Candle, Prediction, TimeFrame, TradingPair};
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn coarse_rows() -> Vec<Candle> {
        let plain = (dec!(100), dec!(106), dec!(99), dec!(105));
        let shooting_star = (dec!(103), dec!(114), dec!(99), dec!(100));
        series(&[plain, plain, shooting_star, plain, plain, shooting_star])
    }

    fn fine_rows() -> Vec<Candle> {
        series(&[(dec!(100), dec!(101), dec!(99), dec!(100.8))])
    }

    fn healthy_source() -> MockCandleSource {
        let mut source = MockCandleSource::new();
        source.expect_get_candles().returning(|_, timeframe, _| {
            Ok(match timeframe {
                TimeFrame::M1 => fine_rows(),
                _ => coarse_rows(),
            })
        });
        source
    }

    #[tokio::test]
    async fn test_refresh_stores_analysis() {
        let mut monitor = PatternMonitor::new(healthy_source(), AnalyzerConfig::default());
        assert!(monitor.last_analysis().is_none());

        let prediction = monitor.refresh().await.unwrap().prediction;
        assert_eq!(prediction, Prediction::Bearish);

        let analysis = monitor.last_analysis().unwrap();
        assert_eq!(analysis.momentum, Prediction::Bullish);
        assert_eq!(analysis.repeated.len(), 1);
        assert_eq!(monitor.stats().refreshes, 1);
        assert!(monitor.stats().last_success.is_some());
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_analysis() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut source = MockCandleSource::new();
        source.expect_get_candles().returning(move |_, timeframe, _| {
            // first cycle fetches fine + coarse, every later call fails
            if counter.fetch_add(1, Ordering::SeqCst) >= 2 {
                return Err(FetchError::Api { status: 503, body: "unavailable".to_string() });
            }
            Ok(match timeframe {
                TimeFrame::M1 => fine_rows(),
                _ => coarse_rows(),
            })
        });

        let mut monitor = PatternMonitor::new(source, AnalyzerConfig::default());
        let first = monitor.refresh().await.unwrap().clone();

        let err = monitor.refresh().await.unwrap_err();
        assert!(matches!(err, MonitorError::Fetch(ref e) if e.is_transient()));

        assert_eq!(monitor.last_analysis(), Some(&first));
        assert_eq!(monitor.stats().refreshes, 2);
        assert_eq!(monitor.stats().failures, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_malformed_candles_are_reported() {
        let mut source = MockCandleSource::new();
        source.expect_get_candles().returning(|_, _, _| {
            // high below close
            Ok(series(&[
                (dec!(100), dec!(101), dec!(99), dec!(100.5)),
                (dec!(100), dec!(101), dec!(99), dec!(103)),
            ]))
        });

        let mut monitor = PatternMonitor::new(source, AnalyzerConfig::default());
        let err = monitor.refresh().await.unwrap_err();
        assert!(matches!(
            err,
            MonitorError::Analysis(AnalysisError::InvalidCandle { index: 1, .. })
        ));
        assert!(monitor.last_analysis().is_none());
    }

    #[tokio::test]
    async fn test_requests_configured_timeframes() {
        let mut source = MockCandleSource::new();
        source
            .expect_get_candles()
            .withf(|_, timeframe, limit| *timeframe == TimeFrame::M15 && *limit == 50)
            .times(1)
            .returning(|_, _, _| Ok(coarse_rows()));
        source
            .expect_get_candles()
            .withf(|_, timeframe, limit| *timeframe == TimeFrame::M5 && *limit == 50)
            .times(1)
            .returning(|_, _, _| Ok(fine_rows()));

        let config = AnalyzerConfig {
            fine_timeframe: TimeFrame::M5,
            coarse_timeframe: TimeFrame::M15,
            candle_limit: 50,
            ..AnalyzerConfig::default()
        };
        let mut monitor = PatternMonitor::new(source, config);
        assert_eq!(monitor.refresh().await.unwrap().prediction, Prediction::Bearish);
    }

    /// Accepts the request and never answers.
    struct StalledSource;

    #[async_trait]
    impl CandleSource for StalledSource {
        async fn get_candles(
            &self,
            _pair: TradingPair,
            _timeframe: TimeFrame,
            _limit: u32,
        ) -> Result<Vec<Candle>, FetchError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_shutdown_interrupts_stalled_refresh() {
        let mut monitor = PatternMonitor::new(StalledSource, AnalyzerConfig::default());
        let shutdown = tokio::time::sleep(Duration::from_millis(50));

        let finished = tokio::time::timeout(
            Duration::from_secs(2),
            monitor.run_until(Duration::from_secs(5), OutputFormat::Json, shutdown),
        )
        .await;

        assert!(matches!(finished, Ok(Ok(()))));
        assert_eq!(monitor.stats().refreshes, 1);
        assert!(monitor.last_analysis().is_none());
    }

    #[tokio::test]
    async fn test_run_refreshes_on_every_tick() {
        let mut monitor = PatternMonitor::new(healthy_source(), AnalyzerConfig::default());
        let shutdown = tokio::time::sleep(Duration::from_millis(120));

        monitor
            .run_until(Duration::from_millis(20), OutputFormat::Json, shutdown)
            .await
            .unwrap();

        assert!(monitor.stats().refreshes >= 2);
        assert_eq!(monitor.stats().failures, 0);
        assert_eq!(
            monitor.last_analysis().map(|a| a.prediction),
            Some(Prediction::Bearish)
        );
    }
}
