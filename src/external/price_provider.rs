use async_trait::async_trait;
use thiserror::Error;

use crate::models::PricePoint;

/// Why a provider could not produce a price series.
///
/// Kept distinct so callers can tell "symbol doesn't exist" apart from
/// "upstream is down".
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PriceProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("symbol not found")]
    NotFound,

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("rate limited")]
    RateLimited,
}

#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Daily history covering roughly the last `days` calendar days,
    /// oldest first, with no-trade days (zero or missing close) removed.
    async fn fetch_daily_history(
        &self,
        ticker: &str,
        days: u32,
    ) -> Result<Vec<PricePoint>, PriceProviderError>;

    fn name(&self) -> &'static str;
}
