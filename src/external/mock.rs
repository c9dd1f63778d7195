use crate::external::price_provider::{PriceProvider, PriceProviderError};
use crate::models::PricePoint;
use async_trait::async_trait;
use chrono::{Datelike, Duration as ChronoDuration, NaiveDate, Utc, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Offline provider producing a random walk per symbol.
///
/// The walk is seeded from the symbol, so the same symbol yields the same
/// series for a given end date. Weekends are skipped.
pub struct MockProvider {
    start_price: f64,
}

impl MockProvider {
    pub fn new() -> Self {
        Self { start_price: 100.0 }
    }

    fn seed_for(ticker: &str) -> u64 {
        ticker
            .bytes()
            .fold(17_u64, |acc, b| acc.wrapping_mul(31).wrapping_add(u64::from(b)))
    }

    pub fn generate(&self, ticker: &str, days: u32, end: NaiveDate) -> Vec<PricePoint> {
        let mut rng = StdRng::seed_from_u64(Self::seed_for(ticker));

        let trading_days: Vec<NaiveDate> = (0..i64::from(days))
            .rev()
            .map(|offset| end - ChronoDuration::days(offset))
            .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
            .collect();

        let mut current = self.start_price;

        trading_days
            .into_iter()
            .map(|date| {
                current *= 1.0 + (rng.random::<f64>() - 0.5) * 0.02;
                let volume = rng.random_range(1_000_000..5_000_000_u64);
                PricePoint::new(date, current, volume)
            })
            .collect()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PriceProvider for MockProvider {
    async fn fetch_daily_history(
        &self,
        ticker: &str,
        days: u32,
    ) -> Result<Vec<PricePoint>, PriceProviderError> {
        Ok(self.generate(ticker, days, Utc::now().date_naive()))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
