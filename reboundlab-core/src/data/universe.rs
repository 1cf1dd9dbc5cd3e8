//! Candidate universe — category-organized ticker lists.
//!
//! The universe is the pool instruments are ranked from before analysis.
//! It is stored as TOML, one array of tickers per category.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::provider::DataError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Universe {
    pub categories: BTreeMap<String, Vec<String>>,
}

impl Universe {
    pub fn from_file(path: &Path) -> Result<Self, DataError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DataError::Other(format!("read universe file {}: {e}", path.display())))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, DataError> {
        toml::from_str(content).map_err(|e| DataError::Other(format!("parse universe TOML: {e}")))
    }

    pub fn to_toml(&self) -> Result<String, DataError> {
        toml::to_string_pretty(self).map_err(|e| DataError::Other(format!("serialize universe: {e}")))
    }

    /// All tickers, deduplicated, in category order.
    pub fn all_tickers(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.categories
            .values()
            .flat_map(|tickers| tickers.iter().map(|t| t.as_str()))
            .filter(|t| seen.insert(*t))
            .collect()
    }

    pub fn category_tickers(&self, category: &str) -> Option<&[String]> {
        self.categories.get(category).map(|v| v.as_slice())
    }

    pub fn ticker_count(&self) -> usize {
        self.all_tickers().len()
    }

    /// The twenty largest US-listed ETFs, grouped by exposure.
    pub fn default_etfs() -> Self {
        let group = |tickers: &[&str]| tickers.iter().map(|t| t.to_string()).collect::<Vec<_>>();

        let mut categories = BTreeMap::new();
        categories.insert(
            "US Large Cap".into(),
            group(&["SPY", "IVV", "VOO", "VTI", "QQQ", "VUG", "VTV"]),
        );
        categories.insert("US Mid/Small Cap".into(), group(&["IJH", "IJR", "VO", "VB"]));
        categories.insert(
            "International".into(),
            group(&["VEA", "IEFA", "VWO", "IEMG", "VXUS"]),
        );
        categories.insert("Bonds".into(), group(&["AGG", "BND"]));
        categories.insert("Commodities".into(), group(&["GLD"]));
        categories.insert("Real Estate".into(), group(&["VNQ"]));

        Self { categories }
    }
}
