use tracing::{info, warn};

use crate::external::price_provider::{PriceProvider, PriceProviderError};
use crate::models::PricePoint;

/// Roughly one year of daily history.
pub const DEFAULT_HISTORY_DAYS: u32 = 365;

/// Fetch daily history, keeping the reason when the provider fails.
pub async fn fetch_history(
    provider: &dyn PriceProvider,
    symbol: &str,
    days: u32,
) -> Result<Vec<PricePoint>, PriceProviderError> {
    match provider.fetch_daily_history(symbol, days).await {
        Ok(points) => {
            info!("📈 Fetched {} price points for {} from {}", points.len(), symbol, provider.name());
            Ok(points)
        }
        Err(e) => {
            warn!("Failed to fetch prices for {} from {}: {}", symbol, provider.name(), e);
            Err(e)
        }
    }
}

/// Fetch one year of daily history, collapsing every failure into an empty series.
///
/// "No data" and "fetch failed" look the same here; use [`fetch_history`]
/// when the difference matters.
pub async fn fetch_series(provider: &dyn PriceProvider, symbol: &str) -> Vec<PricePoint> {
    fetch_history(provider, symbol, DEFAULT_HISTORY_DAYS)
        .await
        .unwrap_or_default()
}
