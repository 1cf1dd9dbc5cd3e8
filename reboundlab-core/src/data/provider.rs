//! Data provider trait, structured errors, and fetch classification.
//!
//! The DataProvider trait abstracts over market-data sources (Yahoo Finance,
//! synthetic data, test mocks). Providers never see the analysis; the batch
//! runner consumes their output through [`FetchOutcome`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{PricePoint, PriceSeries, SeriesError};

/// Raw daily bar from a data provider (before validation).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawBar {
    pub date: NaiveDate,
    pub close: f64,
    pub adj_close: f64,
}

impl RawBar {
    /// Adjusted close when finite, otherwise the raw close.
    pub fn closing_price(&self) -> f64 {
        if self.adj_close.is_finite() {
            self.adj_close
        } else {
            self.close
        }
    }
}

/// Structured error types for data operations.
///
/// These are designed to be displayable in both log output and reports.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("no size metric reported for {symbol}")]
    NoSizeMetric { symbol: String },

    #[error("hard stop: data provider has blocked requests (circuit breaker tripped)")]
    CircuitBreakerTripped,

    #[error("csv import error: {0}")]
    Csv(String),

    #[error(transparent)]
    Quality(#[from] SeriesError),

    #[error("data error: {0}")]
    Other(String),
}

/// Result of a successful history fetch for a single symbol.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub symbol: String,
    pub bars: Vec<RawBar>,
    pub source: DataSource,
}

/// Where the data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    YahooFinance,
    Synthetic,
}

/// Trait for market-data providers.
pub trait DataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily bars for a symbol over a calendar date range.
    fn fetch_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError>;

    /// Scalar size metric (total assets / market cap) used only for ranking.
    fn fetch_size_metric(&self, symbol: &str) -> Result<f64, DataError>;

    /// Check if the provider is currently available (not rate-limited, not blocked).
    fn is_available(&self) -> bool;
}

/// Classification of a history fetch for one instrument.
///
/// Separates "nothing to analyze" from "could not get anything", so a batch
/// keeps going either way.
#[derive(Debug)]
pub enum FetchOutcome {
    Series(PriceSeries),
    Empty,
    Failed(DataError),
}

impl FetchOutcome {
    /// Fetch `symbol` and classify the result.
    ///
    /// Provider errors become `Failed`; a fetch with no usable bars becomes
    /// `Empty`; bars that break series invariants become `Failed` with a
    /// [`DataError::Quality`].
    pub fn fetch(
        provider: &dyn DataProvider,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        if !provider.is_available() {
            return FetchOutcome::Failed(DataError::CircuitBreakerTripped);
        }
        match provider.fetch_history(symbol, start, end) {
            Ok(result) => Self::from_bars(symbol, &result.bars),
            Err(DataError::SymbolNotFound { .. }) => FetchOutcome::Empty,
            Err(e) => FetchOutcome::Failed(e),
        }
    }

    /// Classify already-fetched bars.
    pub fn from_bars(symbol: &str, bars: &[RawBar]) -> Self {
        match closing_series(symbol, bars) {
            Ok(series) if series.is_empty() => FetchOutcome::Empty,
            Ok(series) => FetchOutcome::Series(series),
            Err(e) => FetchOutcome::Failed(DataError::Quality(e)),
        }
    }
}

/// Build a closing-price series from provider bars.
///
/// Bars without any finite price (holidays, halted days) are void and are
/// dropped. Everything else must satisfy the series invariants.
pub fn closing_series(symbol: &str, bars: &[RawBar]) -> Result<PriceSeries, SeriesError> {
    let points: Vec<PricePoint> = bars
        .iter()
        .filter(|bar| bar.closing_price().is_finite())
        .map(|bar| PricePoint::new(bar.date, bar.closing_price()))
        .collect();

    let void = bars.len() - points.len();
    if void > 0 {
        tracing::debug!(symbol, void, "dropped void bars");
    }

    PriceSeries::new(symbol, points)
}

/// Progress callback for multi-symbol operations.
pub trait BatchProgress: Send + Sync {
    /// Called when starting to analyze a symbol.
    fn on_start(&self, symbol: &str, index: usize, total: usize);

    /// Called when a symbol completes. `detail` is a one-line outcome summary.
    fn on_complete(&self, symbol: &str, index: usize, total: usize, detail: &str);

    /// Called when the entire batch is done.
    fn on_batch_complete(&self, analyzed: usize, unavailable: usize, total: usize);
}

/// Progress reporter that emits tracing events.
pub struct LogProgress;

impl BatchProgress for LogProgress {
    fn on_start(&self, symbol: &str, index: usize, total: usize) {
        tracing::info!("[{}/{}] Analyzing {symbol}...", index + 1, total);
    }

    fn on_complete(&self, symbol: &str, _index: usize, _total: usize, detail: &str) {
        tracing::info!("  {symbol}: {detail}");
    }

    fn on_batch_complete(&self, analyzed: usize, unavailable: usize, total: usize) {
        tracing::info!("Batch complete: {analyzed}/{total} analyzed, {unavailable} without data");
    }
}
