mod analysis;
mod price_point;
mod signal;

pub use analysis::{AnalysisResult, ErrorResponse};
pub use price_point::{closes, PricePoint};
pub use signal::{ChangeBaseline, Signal, SignalResult, SignalStrategy};
