use crate::models::{Signal, SignalResult, SignalStrategy};
use crate::services::indicators::latest;

/// Number of sessions the momentum rubric looks back over, inclusive of the latest close.
pub const MOMENTUM_LOOKBACK: usize = 5;

/// Raw score for the latest trading day.
///
/// Returns `None` when either moving average is undefined at the last index
/// (not enough history), or when there are no closes at all.
pub fn score(
    strategy: SignalStrategy,
    closes: &[f64],
    ma20: &[Option<f64>],
    ma50: &[Option<f64>],
) -> Option<f64> {
    let price = *closes.last()?;
    let ma20 = latest(ma20)?;
    let ma50 = latest(ma50)?;

    // Price above both MAs with MA20 above MA50 = strong bullish alignment
    let alignment = if price > ma20 && ma20 > ma50 {
        2.0
    } else if price < ma20 && ma20 < ma50 {
        -2.0
    } else {
        0.0
    };

    let crossover = direction(ma20, ma50);

    let third = match strategy {
        SignalStrategy::Crossover => direction(price, ma20),
        SignalStrategy::Momentum => {
            let reference = closes[closes.len().saturating_sub(MOMENTUM_LOOKBACK)];
            if price > reference {
                0.5
            } else {
                -0.5
            }
        }
    };

    Some(alignment + crossover + third)
}

/// Map a score onto a signal and a strength in [0, 1].
///
/// A missing score means insufficient history and always yields HOLD with
/// strength 0, whatever the strategy.
pub fn classify(strategy: SignalStrategy, score: Option<f64>) -> SignalResult {
    let Some(score) = score else {
        return SignalResult::hold(0.0);
    };

    let (signal, strength) = match strategy {
        SignalStrategy::Crossover => {
            let strength = score.abs() / 5.0;
            if score >= 3.0 {
                (Signal::Buy, strength)
            } else if score <= -3.0 {
                (Signal::Sell, strength)
            } else {
                (Signal::Hold, strength)
            }
        }
        SignalStrategy::Momentum => {
            if score > 1.5 {
                (Signal::Buy, score.abs() / 3.5)
            } else if score < -1.5 {
                (Signal::Sell, score.abs() / 3.5)
            } else {
                (Signal::Hold, 0.5)
            }
        }
    };

    SignalResult {
        signal,
        strength: strength.clamp(0.0, 1.0),
    }
}

pub fn generate_signal(
    strategy: SignalStrategy,
    closes: &[f64],
    ma20: &[Option<f64>],
    ma50: &[Option<f64>],
) -> SignalResult {
    classify(strategy, score(strategy, closes, ma20, ma50))
}

fn direction(a: f64, b: f64) -> f64 {
    if a > b {
        1.0
    } else if a < b {
        -1.0
    } else {
        0.0
    }
}
