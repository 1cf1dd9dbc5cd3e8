//! Analysis configuration file.
//!
//! ```toml
//! [analysis]
//! drop_threshold = -0.10
//! recovery_threshold = 0.15
//! min_offset = 180
//! max_offset = 365
//! lookback_window = 730
//!
//! [universe]
//! top_n = 10
//! history_days = 730
//! file = "universe.toml"
//! ```
//!
//! Every key is optional; missing keys take the defaults above.

use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDate};
use reboundlab_core::data::{DataError, Universe};
use reboundlab_core::{AnalysisParams, ParamsError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_TOP_N: usize = 10;
pub const DEFAULT_HISTORY_DAYS: u32 = 730;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid analysis parameters: {0}")]
    Params(#[from] ParamsError),

    #[error("universe: {0}")]
    Universe(#[from] DataError),

    #[error("top_n must be at least 1")]
    TopN,

    #[error("history_days must be at least 1")]
    HistoryDays,
}

/// Which candidates to rank and how much history to request for each.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UniverseConfig {
    /// Number of instruments analyzed after ranking by size.
    pub top_n: usize,
    /// Calendar days of history requested, ending today.
    pub history_days: u32,
    /// Candidate list; the built-in ETF list when absent.
    pub file: Option<PathBuf>,
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            history_days: DEFAULT_HISTORY_DAYS,
            file: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub analysis: AnalysisParams,
    pub universe: UniverseConfig,
}

impl AnalysisConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.analysis.validate()?;
        if self.universe.top_n == 0 {
            return Err(ConfigError::TopN);
        }
        if self.universe.history_days == 0 {
            return Err(ConfigError::HistoryDays);
        }
        Ok(())
    }

    /// Candidate universe: the configured file, or the built-in ETF list.
    pub fn load_universe(&self) -> Result<Universe, ConfigError> {
        match &self.universe.file {
            Some(path) => Ok(Universe::from_file(path)?),
            None => Ok(Universe::default_etfs()),
        }
    }

    /// Inclusive calendar range of `history_days` ending at `end`.
    pub fn history_range(&self, end: NaiveDate) -> (NaiveDate, NaiveDate) {
        let start = end - Duration::days(i64::from(self.universe.history_days));
        (start, end)
    }
}
