//! Flat presentation rows, one per recovery event.

use chrono::NaiveDate;
use reboundlab_core::{PriceSeries, RecoveryEvent};
use serde::{Deserialize, Serialize};

use crate::batch::BatchReport;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryRecord {
    pub symbol: String,
    pub size_metric: Option<f64>,
    pub drawdown_start_date: NaiveDate,
    /// Date of the drawdown's bottom.
    pub drop_date: NaiveDate,
    pub recovery_date: NaiveDate,
    pub start_price: f64,
    pub bottom_price: f64,
    pub recovery_price: f64,
    /// Negative percentage, e.g. -12.5.
    pub original_drop_percentage: f64,
    pub recovery_percentage: f64,
    pub trading_days_to_recover: usize,
    /// Calendar days between `drop_date` and `recovery_date`.
    pub days_to_recover: i64,
}

impl RecoveryRecord {
    /// Resolve an event's indices against the series it was found in.
    pub fn from_event(
        series: &PriceSeries,
        size_metric: Option<f64>,
        event: &RecoveryEvent,
    ) -> Self {
        let drawdown_start_date = series.date(event.start_index);
        let drop_date = series.date(event.bottom_index);
        let recovery_date = series.date(event.recovery_index);

        Self {
            symbol: event.instrument_id.clone(),
            size_metric,
            drawdown_start_date,
            drop_date,
            recovery_date,
            start_price: series.price(event.start_index),
            bottom_price: event.bottom_price,
            recovery_price: event.recovery_price,
            original_drop_percentage: event.drop_fraction_of_source_event * 100.0,
            recovery_percentage: event.recovery_fraction * 100.0,
            trading_days_to_recover: event.offset(),
            days_to_recover: (recovery_date - drop_date).num_days(),
        }
    }
}

/// All recovery rows of a batch, in instrument order then event order.
pub fn recovery_records(report: &BatchReport) -> Vec<RecoveryRecord> {
    report
        .analyzed()
        .flat_map(|(result, analyzed)| {
            analyzed.analysis.recoveries.iter().map(move |event| {
                RecoveryRecord::from_event(&analyzed.series, result.size_metric, event)
            })
        })
        .collect()
}
