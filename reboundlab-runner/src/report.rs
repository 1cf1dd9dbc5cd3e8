//! Plain-text batch report.

use std::fmt::Write;

use chrono::NaiveDateTime;
use reboundlab_core::AnalysisParams;

use crate::batch::{BatchReport, BatchVerdict};
use crate::records::RecoveryRecord;
use crate::summary::SummaryStats;

const RULE_WIDTH: usize = 80;

pub const NO_MATCHES: &str = "No instruments found matching the criteria.";
pub const NOTHING_ANALYZED: &str = "No instrument could be analyzed.";

/// Render the report for a finished batch.
///
/// `records` must be the rows of `report` (see [`crate::records::recovery_records`]).
/// `top_n` is the configured selection size; `None` for a single-series scan.
pub fn render_report(
    report: &BatchReport,
    records: &[RecoveryRecord],
    top_n: Option<usize>,
    generated_at: NaiveDateTime,
) -> String {
    let mut out = String::new();
    let heavy = "=".repeat(RULE_WIDTH);

    line(&mut out, &heavy);
    line(&mut out, "INSTRUMENT RECOVERY ANALYSIS REPORT");
    line(&mut out, &heavy);
    line(
        &mut out,
        &format!("Analysis Date: {}", generated_at.format("%Y-%m-%d %H:%M:%S")),
    );
    line(&mut out, "");

    line(&mut out, "CRITERIA:");
    for c in criteria(&report.params, top_n) {
        line(&mut out, &format!("- {c}"));
    }
    line(&mut out, "");

    match report.verdict() {
        BatchVerdict::Failed => line(&mut out, NOTHING_ANALYZED),
        BatchVerdict::NoMatches => {
            line(&mut out, NO_MATCHES);
            line(
                &mut out,
                &format!(
                    "- Instruments analyzed: {} ({} drawdowns, none recovered)",
                    report.analyzed_count(),
                    report.total_drawdowns()
                ),
            );
        }
        BatchVerdict::Matches => {
            if let Some(stats) = SummaryStats::from_records(records) {
                summary_section(&mut out, &stats);
            }
            details_section(&mut out, records);
        }
    }

    failures_section(&mut out, report);
    out
}

fn criteria(params: &AnalysisParams, top_n: Option<usize>) -> Vec<String> {
    let mut lines: Vec<String> = top_n
        .map(|n| format!("Top {n} instruments by size"))
        .into_iter()
        .collect();
    lines.extend([
        format!(
            "Drops of {}% or more within {} trading days",
            percent(params.drop_threshold.abs()),
            params.lookback_window
        ),
        format!(
            "Recoveries of {}% or more {}-{} trading days after the bottom",
            percent(params.recovery_threshold),
            params.min_offset,
            params.max_offset
        ),
    ]);
    lines
}

fn summary_section(out: &mut String, stats: &SummaryStats) {
    line(out, "SUMMARY STATISTICS:");
    line(
        out,
        &format!("- Total qualifying instruments: {}", stats.qualifying_instruments),
    );
    line(out, &format!("- Total recovery events: {}", stats.total_events));
    line(
        out,
        &format!(
            "- Average recovery percentage: {:.2}%",
            stats.average_recovery_percentage
        ),
    );
    line(
        out,
        &format!(
            "- Average days to recovery: {:.0} days",
            stats.average_days_to_recover
        ),
    );
    line(out, "");

    line(out, "TOP PERFORMERS (by average recovery percentage):");
    for p in &stats.top_performers {
        let mut row = format!(
            "  {}: {:.2}% recovery in {:.0} days",
            p.symbol, p.average_recovery_percentage, p.average_days_to_recover
        );
        if let Some(size) = p.size_metric {
            let _ = write!(row, " (Size: ${:.1}B)", size / 1e9);
        }
        line(out, &row);
    }
    line(out, "");
}

fn details_section(out: &mut String, records: &[RecoveryRecord]) {
    line(out, "DETAILED RECOVERY EVENTS:");
    line(out, &"-".repeat(RULE_WIDTH));

    let mut sorted: Vec<&RecoveryRecord> = records.iter().collect();
    // Stable: equal recoveries keep batch order.
    sorted.sort_by(|a, b| b.recovery_percentage.total_cmp(&a.recovery_percentage));

    for r in sorted {
        line(out, "");
        line(out, &format!("{}:", r.symbol));
        line(out, &format!("  Drawdown Start: {}", r.drawdown_start_date));
        line(out, &format!("  Drop Date: {}", r.drop_date));
        line(out, &format!("  Recovery Date: {}", r.recovery_date));
        line(
            out,
            &format!("  Original Drop: {:.2}%", r.original_drop_percentage),
        );
        line(out, &format!("  Recovery: {:.2}%", r.recovery_percentage));
        line(
            out,
            &format!(
                "  Days to Recover: {} days ({} trading days)",
                r.days_to_recover, r.trading_days_to_recover
            ),
        );
        line(out, &format!("  Bottom Price: ${:.2}", r.bottom_price));
        line(out, &format!("  Recovery Price: ${:.2}", r.recovery_price));
    }
}

fn failures_section(out: &mut String, report: &BatchReport) {
    let failures: Vec<(&str, &str)> = report.failures().collect();
    if failures.is_empty() {
        return;
    }
    line(out, "");
    line(out, "UNAVAILABLE INSTRUMENTS:");
    for (symbol, reason) in failures {
        line(out, &format!("  {symbol}: {reason}"));
    }
}

fn line(out: &mut String, text: &str) {
    out.push_str(text);
    out.push('\n');
}

/// Fraction as a percentage without trailing zeros: 0.1 -> "10", 0.125 -> "12.5".
fn percent(fraction: f64) -> String {
    let p = (fraction * 10_000.0).round() / 100.0;
    format!("{p}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::analyze_outcome;
    use crate::records::recovery_records;
    use chrono::NaiveDate;
    use reboundlab_core::data::{DataError, FetchOutcome};
    use reboundlab_core::PriceSeries;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn params() -> AnalysisParams {
        AnalysisParams {
            drop_threshold: -0.10,
            recovery_threshold: 0.15,
            min_offset: 2,
            max_offset: 4,
            lookback_window: 5,
        }
    }

    fn series(symbol: &str, closes: &[f64]) -> FetchOutcome {
        FetchOutcome::Series(
            PriceSeries::from_closes(symbol, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), closes)
                .unwrap(),
        )
    }

    #[test]
    fn percent_trims_trailing_zeros() {
        assert_eq!(percent(0.1), "10");
        assert_eq!(percent(0.125), "12.5");
        assert_eq!(percent(0.15), "15");
    }

    #[test]
    fn matches_report_has_all_sections() {
        let p = params();
        let report = BatchReport::new(
            p,
            vec![
                analyze_outcome(
                    "SPY",
                    Some(5.0e11),
                    series("SPY", &[100.0, 95.0, 80.0, 82.0, 90.0, 96.0]),
                    &p,
                ),
                analyze_outcome(
                    "DOWN",
                    Some(1.0e9),
                    FetchOutcome::Failed(DataError::NetworkUnreachable("timeout".into())),
                    &p,
                ),
            ],
        );
        let records = recovery_records(&report);
        let text = render_report(&report, &records, Some(10), at());

        assert!(text.starts_with(&"=".repeat(80)));
        assert!(text.contains("Analysis Date: 2024-06-01 09:30:00"));
        assert!(text.contains("- Top 10 instruments by size"));
        assert!(text.contains("- Drops of 10% or more within 5 trading days"));
        assert!(text.contains("- Recoveries of 15% or more 2-4 trading days after the bottom"));
        assert!(text.contains("- Total qualifying instruments: 1"));
        assert!(text.contains("- Total recovery events: 4"));
        assert!(text.contains("  SPY: "));
        assert!(text.contains("(Size: $500.0B)"));
        assert!(text.contains("DETAILED RECOVERY EVENTS:"));
        assert!(text.contains("  Bottom Price: $80.00"));
        assert!(text.contains("UNAVAILABLE INSTRUMENTS:"));
        assert!(text.contains("  DOWN: network unreachable: timeout"));
        assert!(!text.contains(NO_MATCHES));
    }

    #[test]
    fn details_sorted_by_recovery_descending() {
        let p = params();
        let report = BatchReport::new(
            p,
            vec![analyze_outcome(
                "SPY",
                None,
                series("SPY", &[100.0, 95.0, 80.0, 82.0, 90.0, 96.0]),
                &p,
            )],
        );
        let records = recovery_records(&report);
        let text = render_report(&report, &records, Some(10), at());

        // Bottom 80 recovers 20%, bottom 82 recovers about 17%.
        let first = text.find("  Recovery: 20.00%").unwrap();
        let second = text.find("  Recovery: 17.07%").unwrap();
        assert!(first < second);
    }

    #[test]
    fn no_matches_and_failed_read_differently() {
        let p = params();
        let flat = BatchReport::new(
            p,
            vec![analyze_outcome("FLAT", None, series("FLAT", &[10.0; 6]), &p)],
        );
        let text = render_report(&flat, &[], None, at());
        assert!(text.contains(NO_MATCHES));
        assert!(!text.contains(NOTHING_ANALYZED));

        let empty = BatchReport::new(p, vec![]);
        let text = render_report(&empty, &[], Some(10), at());
        assert!(text.contains(NOTHING_ANALYZED));
        assert!(!text.contains(NO_MATCHES));
        assert!(!text.contains("SUMMARY STATISTICS"));
    }

    #[test]
    fn criteria_show_configured_top_n_and_omit_it_for_scans() {
        let p = params();
        let one = BatchReport::new(
            p,
            vec![analyze_outcome(
                "SPY",
                None,
                series("SPY", &[100.0, 95.0, 80.0, 82.0, 90.0, 96.0]),
                &p,
            )],
        );
        let records = recovery_records(&one);

        let batch = render_report(&one, &records, Some(10), at());
        assert!(batch.contains("- Top 10 instruments by size"));
        assert!(!batch.contains("Top 1 instruments"));

        let scan = render_report(&one, &records, None, at());
        assert!(!scan.contains("instruments by size"));
        assert!(scan.contains("CRITERIA:\n- Drops of 10% or more within 5 trading days"));
    }
}
