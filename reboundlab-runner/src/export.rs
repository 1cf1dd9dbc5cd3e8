//! Artifact export for a finished batch.
//!
//! A batch directory holds:
//! - `recoveries.csv` — one row per recovery event
//! - `batch.json` — every instrument's outcome, drawdowns and recoveries
//! - `report.txt` — the plain-text report
//! - `manifest.json` — parameters, verdict and series hashes for the run
//!
//! Nothing here is read back by the analysis.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use reboundlab_core::AnalysisParams;
use serde::Serialize;

use crate::batch::{BatchReport, BatchVerdict, InstrumentOutcome};
use crate::records::RecoveryRecord;

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize)]
pub struct ManifestEntry {
    pub symbol: String,
    pub status: &'static str,
    pub size_metric: Option<f64>,
    pub points: Option<usize>,
    pub series_hash: Option<String>,
    pub drawdowns: usize,
    pub recoveries: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
    pub schema_version: u32,
    pub generated_at: String,
    pub params: AnalysisParams,
    pub verdict: BatchVerdict,
    pub instruments: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn from_report(report: &BatchReport, generated_at: NaiveDateTime) -> Self {
        let instruments = report
            .instruments
            .iter()
            .map(|r| {
                let (status, analyzed) = match &r.outcome {
                    InstrumentOutcome::Analyzed(a) => ("analyzed", Some(a)),
                    InstrumentOutcome::Unavailable { .. } => ("unavailable", None),
                    InstrumentOutcome::Rejected { .. } => ("rejected", None),
                };
                ManifestEntry {
                    symbol: r.symbol.clone(),
                    status,
                    size_metric: r.size_metric,
                    points: analyzed.map(|a| a.series_info.points),
                    series_hash: analyzed.map(|a| a.series_info.content_hash.clone()),
                    drawdowns: analyzed.map_or(0, |a| a.analysis.drawdowns.len()),
                    recoveries: analyzed.map_or(0, |a| a.analysis.recoveries.len()),
                }
            })
            .collect();

        Self {
            schema_version: SCHEMA_VERSION,
            generated_at: generated_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
            params: report.params,
            verdict: report.verdict(),
            instruments,
        }
    }
}

/// Recovery rows as CSV, header included even when there are no rows.
pub fn export_records_csv(records: &[RecoveryRecord]) -> Result<String> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(vec![]);

    wtr.write_record([
        "symbol",
        "size_metric",
        "drawdown_start_date",
        "drop_date",
        "recovery_date",
        "start_price",
        "bottom_price",
        "recovery_price",
        "original_drop_percentage",
        "recovery_percentage",
        "trading_days_to_recover",
        "days_to_recover",
    ])?;

    for r in records {
        wtr.write_record([
            r.symbol.clone(),
            r.size_metric.map(|m| format!("{m:.0}")).unwrap_or_default(),
            r.drawdown_start_date.to_string(),
            r.drop_date.to_string(),
            r.recovery_date.to_string(),
            format!("{:.4}", r.start_price),
            format!("{:.4}", r.bottom_price),
            format!("{:.4}", r.recovery_price),
            format!("{:.2}", r.original_drop_percentage),
            format!("{:.2}", r.recovery_percentage),
            r.trading_days_to_recover.to_string(),
            r.days_to_recover.to_string(),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Full batch (outcomes and events) as pretty JSON.
pub fn export_batch_json(report: &BatchReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize batch to JSON")
}

/// Write the artifact set into a new `batch_{timestamp}/` under `output_dir`.
///
/// Returns the created directory.
pub fn save_artifacts(
    report: &BatchReport,
    records: &[RecoveryRecord],
    report_text: &str,
    output_dir: &Path,
    generated_at: NaiveDateTime,
) -> Result<PathBuf> {
    let dirname = format!("batch_{}", generated_at.format("%Y%m%d_%H%M%S"));
    let run_dir = output_dir.join(dirname);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    write_file(&run_dir, "recoveries.csv", &export_records_csv(records)?)?;
    write_file(&run_dir, "batch.json", &export_batch_json(report)?)?;
    write_file(&run_dir, "report.txt", report_text)?;

    let manifest = Manifest::from_report(report, generated_at);
    let json =
        serde_json::to_string_pretty(&manifest).context("failed to serialize manifest to JSON")?;
    write_file(&run_dir, "manifest.json", &json)?;

    tracing::info!(dir = %run_dir.display(), rows = records.len(), "saved artifacts");
    Ok(run_dir)
}

fn write_file(dir: &Path, name: &str, contents: &str) -> Result<()> {
    let path = dir.join(name);
    std::fs::write(&path, contents).with_context(|| format!("failed to write {}", path.display()))
}
