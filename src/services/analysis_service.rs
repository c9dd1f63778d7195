use tracing::info;

use crate::config::AnalysisConfig;
use crate::errors::AppError;
use crate::external::price_provider::{PriceProvider, PriceProviderError};
use crate::models::{closes, AnalysisResult, ChangeBaseline, PricePoint};
use crate::services::indicators::sma;
use crate::services::price_service::fetch_history;
use crate::services::signal_service::generate_signal;

pub const SHORT_WINDOW: usize = 20;
pub const LONG_WINDOW: usize = 50;

/// Fetch history for `symbol` and derive moving averages, signal and change.
pub async fn analyze(
    provider: &dyn PriceProvider,
    symbol: &str,
    options: &AnalysisConfig,
) -> Result<AnalysisResult, AppError> {
    let data = fetch_history(provider, symbol, options.history_days)
        .await
        .map_err(|e| match e {
            PriceProviderError::NotFound => not_found(symbol),
            other => AppError::from(other),
        })?;

    build_analysis(symbol, data, options)
}

/// Analysis over an already fetched series.
pub fn build_analysis(
    symbol: &str,
    data: Vec<PricePoint>,
    options: &AnalysisConfig,
) -> Result<AnalysisResult, AppError> {
    if data.is_empty() {
        return Err(not_found(symbol));
    }
    if data.len() < options.min_history {
        return Err(AppError::InsufficientData(format!(
            "Insufficient data for {}: {} trading days, at least {} required",
            symbol,
            data.len(),
            options.min_history
        )));
    }

    let closes = closes(&data);
    let ma20 = sma(&closes, SHORT_WINDOW);
    let ma50 = sma(&closes, LONG_WINDOW);

    let signal = generate_signal(options.strategy, &closes, &ma20, &ma50);
    let (current_price, change, change_percent) = price_change(&closes, options.baseline)
        .ok_or_else(|| AppError::Internal(format!("empty close series for {}", symbol)))?;

    info!(
        "{} analysis: {} ({:.2}) using {} strategy over {} points",
        symbol,
        signal.signal,
        signal.strength,
        options.strategy,
        closes.len()
    );

    Ok(AnalysisResult {
        symbol: symbol.to_string(),
        current_price,
        change,
        change_percent,
        data,
        ma20,
        ma50,
        signal: signal.signal,
        signal_strength: signal.strength,
    })
}

/// Latest close, absolute change and percent change against the chosen baseline.
///
/// A single-point series measured against the previous day has no change.
pub fn price_change(closes: &[f64], baseline: ChangeBaseline) -> Option<(f64, f64, f64)> {
    let current = *closes.last()?;
    let base = match baseline {
        ChangeBaseline::PreviousDay => closes
            .len()
            .checked_sub(2)
            .map(|i| closes[i])
            .unwrap_or(current),
        ChangeBaseline::PeriodStart => closes[0],
    };

    let change = current - base;
    let change_percent = if base == 0.0 { 0.0 } else { change / base * 100.0 };

    Some((current, change, change_percent))
}

fn not_found(symbol: &str) -> AppError {
    AppError::NotFound(format!("No data found for symbol: {}", symbol))
}
