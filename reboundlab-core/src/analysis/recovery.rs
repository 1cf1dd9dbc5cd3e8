//! Recovery matcher — first qualifying rebound inside the offset window.
//!
//! For each drawdown, candidates `k` run from `bottom + min_offset` to
//! `min(bottom + max_offset, len - 1)` in increasing order. The first `k`
//! where `(price[k] - bottom_price) / bottom_price >= recovery_threshold`
//! produces the event and ends the scan. Later drawdowns may land on the same
//! recovery index; that is expected and kept.

use std::collections::HashMap;

use crate::domain::{relative_change, DrawdownEvent, PriceSeries, RecoveryEvent};

/// Match each drawdown to its earliest qualifying recovery.
///
/// Output follows the order of `drawdowns`; drawdowns without a recovery are
/// skipped. Drawdowns sharing a bottom share one scan.
pub fn match_recoveries(
    series: &PriceSeries,
    drawdowns: &[DrawdownEvent],
    recovery_threshold: f64,
    min_offset: usize,
    max_offset: usize,
) -> Vec<RecoveryEvent> {
    let Some(last_index) = series.last_index() else {
        return Vec::new();
    };

    let mut scans: HashMap<(usize, u64), Option<usize>> = HashMap::new();
    let mut events = Vec::new();

    for dd in drawdowns {
        let key = (dd.bottom_index, dd.bottom_price.to_bits());
        let found = *scans.entry(key).or_insert_with(|| {
            first_recovery(
                series,
                dd.bottom_index,
                dd.bottom_price,
                recovery_threshold,
                min_offset,
                max_offset,
                last_index,
            )
        });

        if let Some(k) = found {
            let recovery_price = series.price(k);
            events.push(RecoveryEvent {
                instrument_id: dd.instrument_id.clone(),
                start_index: dd.start_index,
                bottom_index: dd.bottom_index,
                recovery_index: k,
                bottom_price: dd.bottom_price,
                recovery_price,
                recovery_fraction: relative_change(dd.bottom_price, recovery_price),
                drop_fraction_of_source_event: dd.drop_fraction,
            });
        }
    }

    events
}

/// Earliest index in the offset window that clears the threshold.
fn first_recovery(
    series: &PriceSeries,
    bottom_index: usize,
    bottom_price: f64,
    recovery_threshold: f64,
    min_offset: usize,
    max_offset: usize,
    last_index: usize,
) -> Option<usize> {
    let first = bottom_index.checked_add(min_offset)?;
    if first > last_index {
        return None;
    }
    let last = bottom_index.saturating_add(max_offset).min(last_index);

    (first..=last).find(|&k| relative_change(bottom_price, series.price(k)) >= recovery_threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::detect_drawdowns;
    use chrono::NaiveDate;

    fn series(closes: &[f64]) -> PriceSeries {
        PriceSeries::from_closes(
            "IVV",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            closes,
        )
        .unwrap()
    }

    fn drawdown(s: &PriceSeries, start: usize, bottom: usize) -> DrawdownEvent {
        DrawdownEvent {
            instrument_id: s.symbol().to_string(),
            start_index: start,
            bottom_index: bottom,
            start_price: s.price(start),
            bottom_price: s.price(bottom),
            drop_fraction: relative_change(s.price(start), s.price(bottom)),
        }
    }

    #[test]
    fn picks_first_index_clearing_threshold() {
        let s = series(&[100.0, 95.0, 80.0, 82.0, 90.0, 96.0]);
        let events = match_recoveries(&s, &[drawdown(&s, 0, 2)], 0.15, 2, 4);

        assert_eq!(events.len(), 1);
        let e = &events[0];
        // Index 4 gives +12.5% and fails; index 5 gives +20%.
        assert_eq!(e.recovery_index, 5);
        assert_eq!(e.recovery_price, 96.0);
        assert_eq!(e.recovery_fraction, 0.2);
        assert_eq!(e.start_index, 0);
        assert_eq!(e.drop_fraction_of_source_event, -0.2);
    }

    #[test]
    fn earliest_wins_over_larger_later_rebound() {
        let s = series(&[100.0, 80.0, 93.0, 120.0]);
        let events = match_recoveries(&s, &[drawdown(&s, 0, 1)], 0.15, 1, 2);
        assert_eq!(events[0].recovery_index, 2);
    }

    #[test]
    fn respects_min_offset() {
        let s = series(&[100.0, 80.0, 100.0, 81.0, 81.0]);
        // Index 2 qualifies but sits before the window.
        assert!(match_recoveries(&s, &[drawdown(&s, 0, 1)], 0.15, 2, 3).is_empty());
    }

    #[test]
    fn respects_max_offset() {
        let s = series(&[100.0, 80.0, 81.0, 82.0, 100.0]);
        assert!(match_recoveries(&s, &[drawdown(&s, 0, 1)], 0.15, 1, 2).is_empty());
        assert_eq!(
            match_recoveries(&s, &[drawdown(&s, 0, 1)], 0.15, 1, 3)[0].recovery_index,
            4
        );
    }

    #[test]
    fn bottom_at_end_has_no_room() {
        let s = series(&[100.0, 95.0, 80.0]);
        assert!(match_recoveries(&s, &[drawdown(&s, 0, 2)], 0.15, 1, 10).is_empty());
    }

    #[test]
    fn zero_min_offset_scans_from_the_bottom() {
        let s = series(&[100.0, 80.0, 100.0]);
        let events = match_recoveries(&s, &[drawdown(&s, 0, 1)], 0.15, 0, 5);
        assert_eq!(events[0].recovery_index, 2);
    }

    #[test]
    fn overlapping_drawdowns_share_recovery_and_keep_order() {
        let s = series(&[100.0, 95.0, 80.0, 82.0, 90.0, 96.0]);
        let dds = detect_drawdowns(&s, -0.10, 5);
        let events = match_recoveries(&s, &dds, 0.15, 2, 4);

        let got: Vec<(usize, usize, usize)> = events
            .iter()
            .map(|e| (e.start_index, e.bottom_index, e.recovery_index))
            .collect();
        // Bottom 3 (82): only index 5 in window, +17.1% qualifies.
        // Bottom 4 (90): window starts at 6, past the end.
        assert_eq!(got, vec![(0, 2, 5), (0, 3, 5), (1, 2, 5), (1, 3, 5)]);
    }

    #[test]
    fn empty_inputs() {
        let s = series(&[100.0, 80.0]);
        assert!(match_recoveries(&s, &[], 0.15, 0, 10).is_empty());
        assert!(match_recoveries(&PriceSeries::empty("IVV"), &[], 0.15, 0, 10).is_empty());
    }

    #[test]
    fn huge_offsets_do_not_overflow() {
        let s = series(&[100.0, 80.0, 100.0]);
        assert!(match_recoveries(&s, &[drawdown(&s, 0, 1)], 0.15, usize::MAX, usize::MAX)
            .is_empty());
        assert_eq!(
            match_recoveries(&s, &[drawdown(&s, 0, 1)], 0.15, 1, usize::MAX)[0].recovery_index,
            2
        );
    }
}
