//! Drawdown detector — exhaustive pairwise scan over a bounded lookback.
//!
//! For every start `i` and every later `j` within `lookback_window`
//! positions, the pair qualifies when
//! `(price[j] - price[i]) / price[i] <= drop_threshold`.
//!
//! Every qualifying pair is reported. A sustained decline therefore produces
//! many overlapping events; nothing is merged or collapsed to local extrema.
//! Output is ordered by start index, then bottom index.

use crate::domain::{relative_change, DrawdownEvent, PriceSeries};

/// Find every (start, bottom) pair whose decline meets `drop_threshold`.
///
/// Series shorter than two points yield no events. Cost is
/// O(len * lookback_window) comparisons.
pub fn detect_drawdowns(
    series: &PriceSeries,
    drop_threshold: f64,
    lookback_window: usize,
) -> Vec<DrawdownEvent> {
    let n = series.len();
    let mut events = Vec::new();
    if n < 2 {
        return events;
    }

    let points = series.points();
    for i in 0..n - 1 {
        let start_price = points[i].price;
        let last = i.saturating_add(lookback_window).min(n - 1);

        for (j, bottom) in points.iter().enumerate().take(last + 1).skip(i + 1) {
            let drop_fraction = relative_change(start_price, bottom.price);
            if drop_fraction <= drop_threshold {
                events.push(DrawdownEvent {
                    instrument_id: series.symbol().to_string(),
                    start_index: i,
                    bottom_index: j,
                    start_price,
                    bottom_price: bottom.price,
                    drop_fraction,
                });
            }
        }
    }

    events
}
