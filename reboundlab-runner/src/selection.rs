//! Instrument selection by size metric.

use reboundlab_core::data::DataProvider;
use serde::{Deserialize, Serialize};

/// A candidate with the size metric it was ranked by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedInstrument {
    pub symbol: String,
    pub size_metric: f64,
}

impl RankedInstrument {
    pub fn new(symbol: impl Into<String>, size_metric: f64) -> Self {
        Self {
            symbol: symbol.into(),
            size_metric,
        }
    }
}

/// Largest `n` candidates by size metric, descending; ties by symbol.
///
/// Candidates with a non-finite or non-positive metric are dropped. A symbol
/// listed more than once keeps its first entry.
pub fn rank_by_size(candidates: Vec<RankedInstrument>, n: usize) -> Vec<RankedInstrument> {
    let mut seen = std::collections::HashSet::new();
    let mut ranked: Vec<RankedInstrument> = candidates
        .into_iter()
        .filter(|c| c.size_metric.is_finite() && c.size_metric > 0.0)
        .filter(|c| seen.insert(c.symbol.clone()))
        .collect();

    ranked.sort_by(|a, b| {
        b.size_metric
            .total_cmp(&a.size_metric)
            .then_with(|| a.symbol.cmp(&b.symbol))
    });
    ranked.truncate(n);
    ranked
}

/// Query each candidate's size metric and keep the top `n`.
///
/// Candidates whose metric cannot be fetched are logged and skipped. Once the
/// provider reports itself unavailable, the remaining candidates are skipped
/// without further requests.
pub fn select_top_instruments(
    provider: &dyn DataProvider,
    candidates: &[&str],
    n: usize,
) -> Vec<RankedInstrument> {
    let mut sized = Vec::with_capacity(candidates.len());

    for (i, symbol) in candidates.iter().enumerate() {
        if !provider.is_available() {
            tracing::warn!(
                provider = provider.name(),
                skipped = candidates.len() - i,
                "provider unavailable; stopping size lookups"
            );
            break;
        }
        match provider.fetch_size_metric(symbol) {
            Ok(metric) => {
                tracing::debug!(symbol, metric, "size metric");
                sized.push(RankedInstrument::new(*symbol, metric));
            }
            Err(e) => tracing::warn!(symbol, error = %e, "skipping candidate without size metric"),
        }
    }

    let ranked = rank_by_size(sized, n);
    tracing::info!(
        candidates = candidates.len(),
        selected = ranked.len(),
        "selected instruments by size"
    );
    ranked
}
