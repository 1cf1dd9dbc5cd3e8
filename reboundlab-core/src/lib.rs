//! ReboundLab Core — price series, drawdown detection, recovery matching.
//!
//! This crate contains the analytical core and its data boundary:
//! - Domain types (price points, series, drawdown and recovery events)
//! - Drawdown detector: exhaustive (start, bottom) scan over a lookback window
//! - Recovery matcher: earliest qualifying rebound inside an offset window
//! - Data providers (Yahoo Finance, synthetic, CSV import) behind one trait

pub mod analysis;
pub mod data;
pub mod domain;

pub use analysis::{
    analyze_series, detect_drawdowns, match_recoveries, AnalysisParams, InstrumentAnalysis,
    ParamsError,
};
pub use domain::{DrawdownEvent, PricePoint, PriceSeries, RecoveryEvent, SeriesError};

#[cfg(test)]
mod tests {
    use super::*;

    /// Everything a batch runner moves across threads is Send + Sync.
    #[test]
    fn shared_types_are_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<PriceSeries>();
        require_sync::<PriceSeries>();
        require_send::<DrawdownEvent>();
        require_sync::<DrawdownEvent>();
        require_send::<RecoveryEvent>();
        require_sync::<RecoveryEvent>();
        require_send::<InstrumentAnalysis>();
        require_sync::<InstrumentAnalysis>();
        require_send::<AnalysisParams>();
        require_sync::<AnalysisParams>();

        require_send::<data::FetchOutcome>();
        require_send::<data::YahooProvider>();
        require_sync::<data::YahooProvider>();
        require_send::<data::SyntheticProvider>();
        require_sync::<data::SyntheticProvider>();
        require_sync::<data::CircuitBreaker>();
    }
}
