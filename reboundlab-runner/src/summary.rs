//! Summary statistics over recovery rows.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::records::RecoveryRecord;

/// Number of instruments listed as top performers.
pub const TOP_PERFORMERS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Performer {
    pub symbol: String,
    pub events: usize,
    pub average_recovery_percentage: f64,
    pub average_days_to_recover: f64,
    pub size_metric: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub qualifying_instruments: usize,
    pub total_events: usize,
    pub average_recovery_percentage: f64,
    /// Calendar days.
    pub average_days_to_recover: f64,
    /// Best average recovery first; ties by symbol.
    pub top_performers: Vec<Performer>,
}

impl SummaryStats {
    /// `None` when there are no rows to summarize.
    pub fn from_records(records: &[RecoveryRecord]) -> Option<Self> {
        if records.is_empty() {
            return None;
        }

        let n = records.len() as f64;
        let average_recovery_percentage =
            records.iter().map(|r| r.recovery_percentage).sum::<f64>() / n;
        let average_days_to_recover =
            records.iter().map(|r| r.days_to_recover as f64).sum::<f64>() / n;

        let mut by_symbol: BTreeMap<&str, Vec<&RecoveryRecord>> = BTreeMap::new();
        for r in records {
            by_symbol.entry(r.symbol.as_str()).or_default().push(r);
        }

        let mut performers: Vec<Performer> = by_symbol
            .iter()
            .map(|(symbol, rows)| {
                let k = rows.len() as f64;
                Performer {
                    symbol: symbol.to_string(),
                    events: rows.len(),
                    average_recovery_percentage: rows
                        .iter()
                        .map(|r| r.recovery_percentage)
                        .sum::<f64>()
                        / k,
                    average_days_to_recover: rows
                        .iter()
                        .map(|r| r.days_to_recover as f64)
                        .sum::<f64>()
                        / k,
                    size_metric: rows[0].size_metric,
                }
            })
            .collect();

        performers.sort_by(|a, b| {
            b.average_recovery_percentage
                .total_cmp(&a.average_recovery_percentage)
                .then_with(|| a.symbol.cmp(&b.symbol))
        });
        let qualifying_instruments = performers.len();
        performers.truncate(TOP_PERFORMERS);

        Some(Self {
            qualifying_instruments,
            total_events: records.len(),
            average_recovery_percentage,
            average_days_to_recover,
            top_performers: performers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(symbol: &str, recovery_percentage: f64, days_to_recover: i64) -> RecoveryRecord {
        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        RecoveryRecord {
            symbol: symbol.into(),
            size_metric: Some(1.0e9),
            drawdown_start_date: d,
            drop_date: d,
            recovery_date: d,
            start_price: 100.0,
            bottom_price: 85.0,
            recovery_price: 100.0,
            original_drop_percentage: -15.0,
            recovery_percentage,
            trading_days_to_recover: 1,
            days_to_recover,
        }
    }

    #[test]
    fn empty_rows_have_no_summary() {
        assert!(SummaryStats::from_records(&[]).is_none());
    }

    #[test]
    fn averages_and_performers() {
        let stats = SummaryStats::from_records(&[
            record("SPY", 20.0, 200),
            record("SPY", 30.0, 300),
            record("QQQ", 40.0, 190),
        ])
        .unwrap();

        assert_eq!(stats.qualifying_instruments, 2);
        assert_eq!(stats.total_events, 3);
        assert!((stats.average_recovery_percentage - 30.0).abs() < 1e-9);
        assert!((stats.average_days_to_recover - 230.0).abs() < 1e-9);

        let top: Vec<&str> = stats.top_performers.iter().map(|p| p.symbol.as_str()).collect();
        assert_eq!(top, vec!["QQQ", "SPY"]);
        assert_eq!(stats.top_performers[1].events, 2);
        assert!((stats.top_performers[1].average_recovery_percentage - 25.0).abs() < 1e-9);
        assert!((stats.top_performers[1].average_days_to_recover - 250.0).abs() < 1e-9);
    }

    #[test]
    fn performers_capped_at_five() {
        let rows: Vec<RecoveryRecord> = ["A", "B", "C", "D", "E", "F", "G"]
            .iter()
            .enumerate()
            .map(|(i, s)| record(s, 15.0 + i as f64, 200))
            .collect();
        let stats = SummaryStats::from_records(&rows).unwrap();
        assert_eq!(stats.qualifying_instruments, 7);
        assert_eq!(stats.top_performers.len(), TOP_PERFORMERS);
        assert_eq!(stats.top_performers[0].symbol, "G");
    }
}
