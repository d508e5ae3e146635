use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::patterns::{Analysis, PatternMatch, RepeatedPattern};
use crate::types::{TimeFrame, TradingPair};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ForecastReport<'a> {
    pub pair: TradingPair,
    pub fine_timeframe: TimeFrame,
    pub coarse_timeframe: TimeFrame,
    pub generated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub analysis: &'a Analysis,
}

#[derive(Debug, Serialize)]
pub struct PatternReport<'a> {
    pub pair: TradingPair,
    pub timeframe: TimeFrame,
    pub generated_at: DateTime<Utc>,
    pub matches: &'a [PatternMatch],
    pub repeated: &'a [RepeatedPattern],
}

/// Lists matches and repeats; empty input reads as "nothing found".
pub fn format_patterns(matches: &[PatternMatch], repeated: &[RepeatedPattern]) -> String {
    if matches.is_empty() && repeated.is_empty() {
        return "No patterns found.".to_string();
    }

    let mut lines = Vec::new();
    if !matches.is_empty() {
        lines.push("Patterns found:".to_string());
        for m in matches {
            lines.push(format!("- {} at candle {}", m.kind.as_str().to_uppercase(), m.index));
        }
    }
    if !repeated.is_empty() {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push("Repeated patterns:".to_string());
        for r in repeated {
            lines.push(format!(
                "- {} repeated at candles {:?}",
                r.kind.as_str().to_uppercase(),
                r.indices
            ));
        }
    }
    lines.join("\n")
}

pub fn format_forecast(report: &ForecastReport<'_>) -> String {
    format!(
        "=== {} ===\n{}\n\nNext {} candle forecast: {} ({})",
        report.pair.display_name(),
        format_patterns(&report.analysis.matches, &report.analysis.repeated),
        report.coarse_timeframe,
        report.analysis.prediction.as_str().to_uppercase(),
        report.analysis.basis
    )
}

pub fn print_forecast(report: &ForecastReport<'_>, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => println!("\n{}", format_forecast(report)),
        OutputFormat::Json => println!("{}", serde_json::to_string(report)?),
    }
    Ok(())
}

pub fn print_patterns(report: &PatternReport<'_>, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => println!(
            "\n=== {} {} ===\n{}",
            report.pair.display_name(),
            report.timeframe,
            format_patterns(report.matches, report.repeated)
        ),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
    }
    Ok(())
}
