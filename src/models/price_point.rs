use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// One trading day of history for a symbol, as returned by a price provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,        // serialized as YYYY-MM-DD
    pub close: f64,
    pub volume: u64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64, volume: u64) -> Self {
        Self { date, close, volume }
    }
}

/// Closing prices of a series, in the same order.
pub fn closes(points: &[PricePoint]) -> Vec<f64> {
    points.iter().map(|p| p.close).collect()
}
