use std::sync::OnceLock;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use regex::Regex;
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::config::AnalysisConfig;
use crate::errors::AppError;
use crate::models::{AnalysisResult, ChangeBaseline, SignalStrategy};
use crate::services::analysis_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_stock_analysis))
}

#[derive(Debug, Deserialize)]
pub struct StockQuery {
    /// Ticker symbol, 1-10 alphanumeric characters (case-insensitive)
    symbol: Option<String>,

    /// Scoring rubric: crossover (default) or momentum
    strategy: Option<String>,

    /// Change baseline: previous_day (default) or period_start
    baseline: Option<String>,
}

fn symbol_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Z0-9]{1,10}$").expect("symbol pattern is valid"))
}

/// Trim and uppercase a raw symbol, rejecting anything that isn't a short alphanumeric ticker.
///
/// Only ASCII letters are case-folded, so non-ASCII input never folds into a valid ticker.
pub fn normalize_symbol(raw: Option<&str>) -> Result<String, AppError> {
    let symbol = raw
        .map(|s| s.trim().to_ascii_uppercase())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation("Symbol is required".to_string()))?;

    if !symbol_pattern().is_match(&symbol) {
        return Err(AppError::Validation("Invalid symbol format".to_string()));
    }

    Ok(symbol)
}

fn request_options(defaults: &AnalysisConfig, query: &StockQuery) -> Result<AnalysisConfig, AppError> {
    let mut options = defaults.clone();

    if let Some(raw) = query.strategy.as_deref().filter(|s| !s.trim().is_empty()) {
        options.strategy = raw.parse::<SignalStrategy>().map_err(AppError::Validation)?;
    }
    if let Some(raw) = query.baseline.as_deref().filter(|s| !s.trim().is_empty()) {
        options.baseline = raw.parse::<ChangeBaseline>().map_err(AppError::Validation)?;
    }

    Ok(options)
}

/// Analyze a ticker: price history, 20/50-day SMAs and a BUY/SELL/HOLD signal
///
/// # Example
/// ```text
/// GET /api/stock?symbol=AAPL&strategy=momentum&baseline=period_start
/// ```
pub async fn get_stock_analysis(
    query: Result<Query<StockQuery>, QueryRejection>,
    State(state): State<AppState>,
) -> Result<Json<AnalysisResult>, AppError> {
    let Query(query) = query.map_err(|rejection| {
        warn!("GET /api/stock - rejected query string: {}", rejection.body_text());
        AppError::Validation(rejection.body_text())
    })?;
    let symbol = normalize_symbol(query.symbol.as_deref()).map_err(|e| {
        warn!("GET /api/stock - rejected symbol {:?}: {}", query.symbol, e);
        e
    })?;
    let options = request_options(&state.analysis, &query)?;

    info!(
        "GET /api/stock?symbol={} - strategy={}, baseline={}",
        symbol, options.strategy, options.baseline
    );

    let result = analysis_service::analyze(state.price_provider.as_ref(), &symbol, &options)
        .await
        .map_err(|e| {
            match &e {
                AppError::NotFound(_) | AppError::InsufficientData(_) => {
                    info!("No usable data for {}: {}", symbol, e)
                }
                AppError::RateLimited => warn!("Rate limited when fetching prices for {}", symbol),
                _ => error!("Failed to analyze {}: {}", symbol, e),
            }
            e
        })?;

    Ok(Json(result))
}
