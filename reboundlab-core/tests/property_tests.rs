//! Property tests for scan invariants.
//!
//! Uses proptest to verify:
//! 1. Detector purity and completeness against a brute-force enumeration
//! 2. Drawdown bounds — span within lookback, drop at or below threshold
//! 3. Recovery bounds — offset window, threshold, earliest qualifying index
//! 4. Monotonicity — tighter thresholds never find more events

use chrono::NaiveDate;
use proptest::prelude::*;
use reboundlab_core::{detect_drawdowns, match_recoveries, PriceSeries};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_closes() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(
        (1.0..200.0_f64).prop_map(|p| (p * 100.0).round() / 100.0),
        0..60,
    )
}

fn arb_drop_threshold() -> impl Strategy<Value = f64> {
    -0.6..=0.0_f64
}

fn arb_recovery_threshold() -> impl Strategy<Value = f64> {
    0.01..0.8_f64
}

fn arb_offsets() -> impl Strategy<Value = (usize, usize)> {
    (0usize..12, 1usize..25).prop_map(|(min, width)| (min, min + width))
}

fn series(closes: &[f64]) -> PriceSeries {
    PriceSeries::from_closes("TEST", NaiveDate::from_ymd_opt(2022, 1, 3).unwrap(), closes)
        .unwrap()
}

// ── 1. Detector purity and completeness ──────────────────────────────

proptest! {
    /// Running the detector twice on the same series gives identical output.
    #[test]
    fn detector_is_idempotent(
        closes in arb_closes(),
        threshold in arb_drop_threshold(),
        lookback in 1usize..40,
    ) {
        let s = series(&closes);
        prop_assert_eq!(
            detect_drawdowns(&s, threshold, lookback),
            detect_drawdowns(&s, threshold, lookback)
        );
    }

    /// The detector reports exactly the pairs a naive double loop finds, in (start, bottom) order.
    #[test]
    fn detector_matches_brute_force(
        closes in arb_closes(),
        threshold in arb_drop_threshold(),
        lookback in 1usize..40,
    ) {
        let s = series(&closes);
        let mut expected = Vec::new();
        for i in 0..closes.len() {
            for j in (i + 1)..closes.len() {
                if j - i <= lookback && (closes[j] - closes[i]) / closes[i] <= threshold {
                    expected.push((i, j));
                }
            }
        }

        let got: Vec<(usize, usize)> = detect_drawdowns(&s, threshold, lookback)
            .iter()
            .map(|e| (e.start_index, e.bottom_index))
            .collect();
        prop_assert_eq!(got, expected);
    }
}

// ── 2. Drawdown bounds ───────────────────────────────────────────────

proptest! {
    #[test]
    fn drawdowns_respect_lookback_and_threshold(
        closes in arb_closes(),
        threshold in arb_drop_threshold(),
        lookback in 1usize..40,
    ) {
        let s = series(&closes);
        for e in detect_drawdowns(&s, threshold, lookback) {
            prop_assert!(e.start_index < e.bottom_index);
            prop_assert!(e.bottom_index - e.start_index <= lookback);
            prop_assert!(e.drop_fraction <= threshold);
            prop_assert_eq!(e.start_price, closes[e.start_index]);
            prop_assert_eq!(e.bottom_price, closes[e.bottom_index]);
        }
    }
}

// ── 3. Recovery bounds and earliest-wins ─────────────────────────────

proptest! {
    #[test]
    fn recoveries_are_bounded_and_earliest(
        closes in arb_closes(),
        drop in arb_drop_threshold(),
        lookback in 1usize..40,
        recovery in arb_recovery_threshold(),
        (min_offset, max_offset) in arb_offsets(),
    ) {
        let s = series(&closes);
        let drawdowns = detect_drawdowns(&s, drop, lookback);
        let recoveries = match_recoveries(&s, &drawdowns, recovery, min_offset, max_offset);

        for r in &recoveries {
            let offset = r.recovery_index - r.bottom_index;
            prop_assert!(offset >= min_offset && offset <= max_offset);
            prop_assert!(r.recovery_fraction >= recovery);
            prop_assert_eq!(r.recovery_price, closes[r.recovery_index]);

            // No earlier index in the window qualifies.
            for k in (r.bottom_index + min_offset)..r.recovery_index {
                prop_assert!((closes[k] - r.bottom_price) / r.bottom_price < recovery);
            }
        }
    }

    /// A drawdown left unmatched has no qualifying index anywhere in its window,
    /// and matched events keep the order of their source drawdowns.
    #[test]
    fn unmatched_drawdowns_have_no_candidate(
        closes in arb_closes(),
        drop in arb_drop_threshold(),
        lookback in 1usize..40,
        recovery in arb_recovery_threshold(),
        (min_offset, max_offset) in arb_offsets(),
    ) {
        let s = series(&closes);
        let drawdowns = detect_drawdowns(&s, drop, lookback);
        let recoveries = match_recoveries(&s, &drawdowns, recovery, min_offset, max_offset);

        let mut matched = recoveries.iter().peekable();
        for dd in &drawdowns {
            let hit = matched
                .peek()
                .map(|r| (r.start_index, r.bottom_index) == (dd.start_index, dd.bottom_index))
                .unwrap_or(false);
            if hit {
                matched.next();
                continue;
            }
            let first = dd.bottom_index + min_offset;
            let last = (dd.bottom_index + max_offset).min(closes.len() - 1);
            for k in first..=last {
                prop_assert!((closes[k] - dd.bottom_price) / dd.bottom_price < recovery);
            }
        }
        prop_assert!(matched.next().is_none(), "recoveries out of drawdown order");
    }
}

// ── 4. Monotonicity ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn tighter_drop_threshold_never_finds_more(
        closes in arb_closes(),
        threshold in arb_drop_threshold(),
        tighten in 0.0..0.3_f64,
        lookback in 1usize..40,
    ) {
        let s = series(&closes);
        let loose = detect_drawdowns(&s, threshold, lookback).len();
        let tight = detect_drawdowns(&s, threshold - tighten, lookback).len();
        prop_assert!(tight <= loose);
    }

    #[test]
    fn tighter_recovery_threshold_never_finds_more(
        closes in arb_closes(),
        drop in arb_drop_threshold(),
        lookback in 1usize..40,
        recovery in arb_recovery_threshold(),
        tighten in 0.0..0.5_f64,
        (min_offset, max_offset) in arb_offsets(),
    ) {
        let s = series(&closes);
        let drawdowns = detect_drawdowns(&s, drop, lookback);
        let loose = match_recoveries(&s, &drawdowns, recovery, min_offset, max_offset).len();
        let tight =
            match_recoveries(&s, &drawdowns, recovery + tighten, min_offset, max_offset).len();
        prop_assert!(tight <= loose);
    }
}
