//! Drawdown and recovery events produced by the scans.
//!
//! Both event types refer to their series purely by index. They are created
//! once and never mutated; downstream code joins on the index fields.

use serde::{Deserialize, Serialize};

/// A (start, bottom) pair whose relative decline met the drop threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawdownEvent {
    pub instrument_id: String,
    pub start_index: usize,
    pub bottom_index: usize,
    pub start_price: f64,
    pub bottom_price: f64,
    /// `(bottom_price - start_price) / start_price`, always <= 0 for emitted events.
    pub drop_fraction: f64,
}

impl DrawdownEvent {
    /// Positions between start and bottom.
    pub fn span(&self) -> usize {
        self.bottom_index - self.start_index
    }
}

/// The first qualifying rebound after a drawdown's bottom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryEvent {
    pub instrument_id: String,
    /// Start of the source drawdown.
    pub start_index: usize,
    pub bottom_index: usize,
    pub recovery_index: usize,
    pub bottom_price: f64,
    pub recovery_price: f64,
    /// `(recovery_price - bottom_price) / bottom_price`.
    pub recovery_fraction: f64,
    pub drop_fraction_of_source_event: f64,
}

impl RecoveryEvent {
    /// Trading days (series positions) from bottom to recovery.
    pub fn offset(&self) -> usize {
        self.recovery_index - self.bottom_index
    }
}

/// Relative change from `from` to `to`.
///
/// Callers guarantee `from > 0`; a validated `PriceSeries` never holds anything else.
#[inline]
pub fn relative_change(from: f64, to: f64) -> f64 {
    (to - from) / from
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_change_signs() {
        assert_eq!(relative_change(100.0, 80.0), -0.2);
        assert_eq!(relative_change(80.0, 96.0), 0.2);
        assert_eq!(relative_change(50.0, 50.0), 0.0);
    }

    #[test]
    fn span_and_offset() {
        let dd = DrawdownEvent {
            instrument_id: "QQQ".into(),
            start_index: 3,
            bottom_index: 10,
            start_price: 100.0,
            bottom_price: 85.0,
            drop_fraction: -0.15,
        };
        assert_eq!(dd.span(), 7);

        let rec = RecoveryEvent {
            instrument_id: "QQQ".into(),
            start_index: 3,
            bottom_index: 10,
            recovery_index: 200,
            bottom_price: 85.0,
            recovery_price: 100.0,
            recovery_fraction: relative_change(85.0, 100.0),
            drop_fraction_of_source_event: -0.15,
        };
        assert_eq!(rec.offset(), 190);
    }

    #[test]
    fn recovery_serializes_source_drop_under_stable_key() {
        let rec = RecoveryEvent {
            instrument_id: "X".into(),
            start_index: 0,
            bottom_index: 1,
            recovery_index: 3,
            bottom_price: 80.0,
            recovery_price: 96.0,
            recovery_fraction: 0.2,
            drop_fraction_of_source_event: -0.2,
        };
        let json: serde_json::Value = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["drop_fraction_of_source_event"], -0.2);
        assert!(json.get("source_drop_fraction").is_none());

        let back: RecoveryEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, rec);
    }
}
