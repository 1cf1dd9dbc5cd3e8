//! ReboundLab Runner — batch orchestration, selection, reporting, export.
//!
//! This crate builds on `reboundlab-core` to provide:
//! - Configuration file with defaults for every analysis parameter
//! - Instrument selection by size metric
//! - Batch analysis with per-instrument failure isolation (rayon parallel)
//! - Recovery rows, summary statistics and the plain-text report
//! - Artifact export (CSV, JSON, report, manifest)

pub mod batch;
pub mod config;
pub mod export;
pub mod records;
pub mod report;
pub mod selection;
pub mod summary;

pub use batch::{
    analyze_outcome, AnalyzedInstrument, BatchReport, BatchRunner, BatchVerdict,
    InstrumentOutcome, InstrumentResult, SeriesInfo,
};
pub use config::{AnalysisConfig, ConfigError, UniverseConfig};
pub use export::{export_batch_json, export_records_csv, save_artifacts, Manifest};
pub use records::{recovery_records, RecoveryRecord};
pub use report::render_report;
pub use selection::{rank_by_size, select_top_instruments, RankedInstrument};
pub use summary::{Performer, SummaryStats};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn batch_report_is_send_sync() {
        assert_send::<BatchReport>();
        assert_sync::<BatchReport>();
    }

    #[test]
    fn batch_runner_is_sync() {
        assert_sync::<BatchRunner<'static>>();
    }

    #[test]
    fn records_are_send_sync() {
        assert_send::<RecoveryRecord>();
        assert_sync::<RecoveryRecord>();
        assert_send::<SummaryStats>();
        assert_sync::<SummaryStats>();
    }

    #[test]
    fn config_is_send_sync() {
        assert_send::<AnalysisConfig>();
        assert_sync::<AnalysisConfig>();
    }
}
