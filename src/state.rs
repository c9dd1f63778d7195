use std::sync::Arc;

use crate::config::AnalysisConfig;
use crate::external::price_provider::PriceProvider;

#[derive(Clone)]
pub struct AppState {
    pub price_provider: Arc<dyn PriceProvider>,
    pub analysis: Arc<AnalysisConfig>,
}

impl AppState {
    pub fn new(price_provider: Arc<dyn PriceProvider>, analysis: AnalysisConfig) -> Self {
        Self {
            price_provider,
            analysis: Arc::new(analysis),
        }
    }
}
