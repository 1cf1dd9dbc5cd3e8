//! Analysis parameters with their defaults and validation.
//!
//! `lookback_window`, `min_offset` and `max_offset` count series positions
//! (trading days present in the data), never calendar days.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_DROP_THRESHOLD: f64 = -0.10;
pub const DEFAULT_RECOVERY_THRESHOLD: f64 = 0.15;
pub const DEFAULT_MIN_OFFSET: usize = 180;
pub const DEFAULT_MAX_OFFSET: usize = 365;
pub const DEFAULT_LOOKBACK_WINDOW: usize = 730;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamsError {
    #[error("drop_threshold must be a finite fraction in [-1, 0], got {0}")]
    DropThreshold(f64),

    #[error("recovery_threshold must be a finite fraction > 0, got {0}")]
    RecoveryThreshold(f64),

    #[error("lookback_window must be >= 1")]
    LookbackWindow,

    #[error("max_offset must be >= 1")]
    MaxOffset,

    #[error("max_offset ({max_offset}) must be >= min_offset ({min_offset})")]
    OffsetOrder { min_offset: usize, max_offset: usize },
}

/// Thresholds and windows for one analysis pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisParams {
    /// Negative fraction, e.g. -0.10 for a 10% decline.
    pub drop_threshold: f64,
    /// Positive fraction measured from the bottom price.
    pub recovery_threshold: f64,
    pub min_offset: usize,
    pub max_offset: usize,
    pub lookback_window: usize,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            drop_threshold: DEFAULT_DROP_THRESHOLD,
            recovery_threshold: DEFAULT_RECOVERY_THRESHOLD,
            min_offset: DEFAULT_MIN_OFFSET,
            max_offset: DEFAULT_MAX_OFFSET,
            lookback_window: DEFAULT_LOOKBACK_WINDOW,
        }
    }
}

impl AnalysisParams {
    pub fn validate(&self) -> Result<(), ParamsError> {
        if !self.drop_threshold.is_finite() || !(-1.0..=0.0).contains(&self.drop_threshold) {
            return Err(ParamsError::DropThreshold(self.drop_threshold));
        }
        if !self.recovery_threshold.is_finite() || self.recovery_threshold <= 0.0 {
            return Err(ParamsError::RecoveryThreshold(self.recovery_threshold));
        }
        if self.lookback_window == 0 {
            return Err(ParamsError::LookbackWindow);
        }
        if self.max_offset == 0 {
            return Err(ParamsError::MaxOffset);
        }
        if self.max_offset < self.min_offset {
            return Err(ParamsError::OffsetOrder {
                min_offset: self.min_offset,
                max_offset: self.max_offset,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let p = AnalysisParams::default();
        assert!(p.validate().is_ok());
        assert_eq!(p.drop_threshold, -0.10);
        assert_eq!(p.recovery_threshold, 0.15);
        assert_eq!((p.min_offset, p.max_offset, p.lookback_window), (180, 365, 730));
    }

    #[test]
    fn rejects_positive_drop_threshold() {
        let p = AnalysisParams {
            drop_threshold: 0.05,
            ..Default::default()
        };
        assert_eq!(p.validate(), Err(ParamsError::DropThreshold(0.05)));
    }

    #[test]
    fn zero_drop_threshold_is_allowed() {
        let p = AnalysisParams {
            drop_threshold: 0.0,
            ..Default::default()
        };
        assert!(p.validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_recovery_threshold() {
        let p = AnalysisParams {
            recovery_threshold: 0.0,
            ..Default::default()
        };
        assert!(matches!(p.validate(), Err(ParamsError::RecoveryThreshold(_))));
    }

    #[test]
    fn rejects_inverted_offsets() {
        let p = AnalysisParams {
            min_offset: 10,
            max_offset: 5,
            ..Default::default()
        };
        assert_eq!(
            p.validate(),
            Err(ParamsError::OffsetOrder {
                min_offset: 10,
                max_offset: 5
            })
        );
    }

    #[test]
    fn rejects_zero_windows() {
        let p = AnalysisParams {
            lookback_window: 0,
            ..Default::default()
        };
        assert_eq!(p.validate(), Err(ParamsError::LookbackWindow));

        let p = AnalysisParams {
            min_offset: 0,
            max_offset: 0,
            ..Default::default()
        };
        assert_eq!(p.validate(), Err(ParamsError::MaxOffset));
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let p: AnalysisParams = toml::from_str("drop_threshold = -0.2").unwrap();
        assert_eq!(p.drop_threshold, -0.2);
        assert_eq!(p.max_offset, DEFAULT_MAX_OFFSET);
    }
}
