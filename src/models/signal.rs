use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Discrete recommendation derived from the latest price and moving averages
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Signal {
    #[serde(rename = "BUY")]
    Buy,

    #[serde(rename = "SELL")]
    Sell,

    #[serde(rename = "HOLD")]
    Hold,
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Signal::Buy => write!(f, "BUY"),
            Signal::Sell => write!(f, "SELL"),
            Signal::Hold => write!(f, "HOLD"),
        }
    }
}

/// A signal together with its confidence in [0, 1]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SignalResult {
    pub signal: Signal,
    pub strength: f64,
}

impl SignalResult {
    pub fn hold(strength: f64) -> Self {
        Self {
            signal: Signal::Hold,
            strength: strength.clamp(0.0, 1.0),
        }
    }
}

/// Scoring rubric used to turn moving averages into a signal
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum SignalStrategy {
    /// Price/MA20/MA50 alignment with integer contributions.
    /// BUY at score >= 3, SELL at score <= -3.
    #[default]
    #[serde(rename = "crossover")]
    Crossover,

    /// Alignment plus a short-term momentum term worth +/-0.5.
    /// BUY above 1.5, SELL below -1.5.
    #[serde(rename = "momentum")]
    Momentum,
}

impl std::fmt::Display for SignalStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalStrategy::Crossover => write!(f, "crossover"),
            SignalStrategy::Momentum => write!(f, "momentum"),
        }
    }
}

impl FromStr for SignalStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "crossover" => Ok(SignalStrategy::Crossover),
            "momentum" => Ok(SignalStrategy::Momentum),
            other => Err(format!(
                "Invalid strategy: {}. Must be 'crossover' or 'momentum'",
                other
            )),
        }
    }
}

/// Which close `change` and `changePercent` are measured against
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ChangeBaseline {
    /// Close of the trading day before the latest one
    #[default]
    #[serde(rename = "previous_day")]
    PreviousDay,

    /// Oldest close in the fetched series
    #[serde(rename = "period_start")]
    PeriodStart,
}

impl std::fmt::Display for ChangeBaseline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeBaseline::PreviousDay => write!(f, "previous_day"),
            ChangeBaseline::PeriodStart => write!(f, "period_start"),
        }
    }
}

impl FromStr for ChangeBaseline {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "previous_day" => Ok(ChangeBaseline::PreviousDay),
            "period_start" => Ok(ChangeBaseline::PeriodStart),
            other => Err(format!(
                "Invalid baseline: {}. Must be 'previous_day' or 'period_start'",
                other
            )),
        }
    }
}
