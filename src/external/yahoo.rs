use crate::config::UpstreamConfig;
use crate::external::price_provider::{PriceProvider, PriceProviderError};
use crate::models::PricePoint;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

/// Yahoo Finance v8 chart client.
///
/// No API key required. The endpoint tends to reject obvious bots, so every
/// request carries the configured browser-like User-Agent.
pub struct YahooProvider {
    client: reqwest::Client,
    base_url: String,
}

impl YahooProvider {
    pub fn new(config: &UpstreamConfig) -> Result<Self, PriceProviderError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| PriceProviderError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

// Minimal response structs (only what we need)
#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    #[serde(default)]
    result: Option<Vec<YahooResult>>,
    #[serde(default)]
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    indicators: Option<YahooIndicators>,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    #[serde(default)]
    quote: Vec<YahooQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooQuote {
    #[serde(default)]
    close: Option<Vec<Option<f64>>>,
    #[serde(default)]
    volume: Option<Vec<Option<f64>>>,
}

/// Yahoo uses "1d", "5d", "1mo", "3mo", "6mo", "1y", "2y", "5y", "10y", "ytd", "max"
pub fn range_for_days(days: u32) -> &'static str {
    if days <= 5 {
        "5d"
    } else if days <= 30 {
        "1mo"
    } else if days <= 90 {
        "3mo"
    } else if days <= 180 {
        "6mo"
    } else if days <= 365 {
        "1y"
    } else if days <= 730 {
        "2y"
    } else {
        "5y"
    }
}

/// Turn a chart payload into price points.
///
/// Timestamps drive the output; closes and volumes are looked up by index.
/// A missing, null or non-positive close marks a no-trade day and the point
/// is skipped. A missing volume becomes 0.
pub fn parse_chart(body: &str) -> Result<Vec<PricePoint>, PriceProviderError> {
    let body: YahooChartResponse = serde_json::from_str(body)
        .map_err(|e| PriceProviderError::MalformedResponse(e.to_string()))?;

    if let Some(error) = body.chart.error {
        let description = error.description.unwrap_or_default();
        let not_found = error.code.as_deref() == Some("Not Found")
            || description.contains("No data found");
        if not_found {
            return Err(PriceProviderError::NotFound);
        }
        return Err(PriceProviderError::MalformedResponse(description));
    }

    let result = body
        .chart
        .result
        .ok_or_else(|| PriceProviderError::MalformedResponse("missing chart.result".into()))?
        .into_iter()
        .next()
        .ok_or(PriceProviderError::NotFound)?;

    let quote = result
        .indicators
        .and_then(|i| i.quote.into_iter().next())
        .ok_or_else(|| PriceProviderError::MalformedResponse("missing quote".into()))?;

    let timestamps = result.timestamp.unwrap_or_default();
    let closes = quote.close.unwrap_or_default();
    let volumes = quote.volume.unwrap_or_default();

    let mut points: Vec<PricePoint> = timestamps
        .iter()
        .enumerate()
        .filter_map(|(i, ts)| {
            // skip no-trade days
            let close = closes.get(i).copied().flatten()?;
            if !close.is_finite() || close <= 0.0 {
                return None;
            }

            let date = chrono::DateTime::from_timestamp(*ts, 0)?.date_naive();

            let volume = volumes
                .get(i)
                .copied()
                .flatten()
                .filter(|v| v.is_finite() && *v > 0.0)
                .map(|v| v.round() as u64)
                .unwrap_or(0);

            Some(PricePoint::new(date, close, volume))
        })
        .collect();

    // Ensure ascending by date
    points.sort_by_key(|p| p.date);

    Ok(points)
}

#[async_trait]
impl PriceProvider for YahooProvider {
    async fn fetch_daily_history(
        &self,
        ticker: &str,
        days: u32,
    ) -> Result<Vec<PricePoint>, PriceProviderError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, ticker);
        let range = range_for_days(days);

        debug!("Fetching {} daily history for {} from {}", range, ticker, url);

        let resp = self
            .client
            .get(&url)
            .query(&[("interval", "1d"), ("range", range)])
            .send()
            .await
            .map_err(|e| PriceProviderError::Network(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(PriceProviderError::RateLimited);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(PriceProviderError::NotFound);
        }
        if !status.is_success() {
            return Err(PriceProviderError::Network(format!("HTTP {}", status)));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| PriceProviderError::Network(e.to_string()))?;

        parse_chart(&body)
    }

    fn name(&self) -> &'static str {
        "yahoo"
    }
}
