use serde::Serialize;

use super::{PricePoint, Signal};

/// Response body for a single-symbol analysis.
///
/// `data`, `ma20` and `ma50` are aligned index-for-index; moving average
/// entries are `null` until enough history exists.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub symbol: String,
    pub current_price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub data: Vec<PricePoint>,
    pub ma20: Vec<Option<f64>>,
    pub ma50: Vec<Option<f64>>,
    pub signal: Signal,
    pub signal_strength: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
