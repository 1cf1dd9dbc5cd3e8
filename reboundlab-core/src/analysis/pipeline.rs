//! Per-instrument pipeline: detector output feeds the matcher.

use serde::{Deserialize, Serialize};

use super::drawdown::detect_drawdowns;
use super::params::AnalysisParams;
use super::recovery::match_recoveries;
use crate::domain::{DrawdownEvent, PriceSeries, RecoveryEvent};

/// Everything one analysis pass found for one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentAnalysis {
    pub instrument_id: String,
    pub drawdowns: Vec<DrawdownEvent>,
    pub recoveries: Vec<RecoveryEvent>,
}

impl InstrumentAnalysis {
    pub fn has_recoveries(&self) -> bool {
        !self.recoveries.is_empty()
    }
}

/// Run the detector then the matcher over `series`.
///
/// Parameters are taken as given; call [`AnalysisParams::validate`] first
/// when they come from user input.
pub fn analyze_series(series: &PriceSeries, params: &AnalysisParams) -> InstrumentAnalysis {
    let drawdowns = detect_drawdowns(series, params.drop_threshold, params.lookback_window);
    let recoveries = match_recoveries(
        series,
        &drawdowns,
        params.recovery_threshold,
        params.min_offset,
        params.max_offset,
    );

    InstrumentAnalysis {
        instrument_id: series.symbol().to_string(),
        drawdowns,
        recoveries,
    }
}
