//! Drawdown detection and recovery matching.
//!
//! Both scans are pure functions of (series, thresholds, windows): no I/O,
//! no shared state, deterministic output order.

pub mod drawdown;
pub mod params;
pub mod pipeline;
pub mod recovery;

pub use drawdown::detect_drawdowns;
pub use params::{AnalysisParams, ParamsError};
pub use pipeline::{analyze_series, InstrumentAnalysis};
pub use recovery::match_recoveries;
