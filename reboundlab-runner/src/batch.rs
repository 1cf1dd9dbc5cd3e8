//! Batch analysis across instruments.
//!
//! Each instrument is fetched, validated and analyzed in isolation: a failed
//! fetch or a bad series marks that instrument and the batch continues.
//! Results come back in the order instruments were supplied, with or without
//! parallelism.

use chrono::NaiveDate;
use rayon::prelude::*;
use reboundlab_core::data::{BatchProgress, DataError, DataProvider, FetchOutcome};
use reboundlab_core::{analyze_series, AnalysisParams, InstrumentAnalysis, ParamsError, PriceSeries};
use serde::Serialize;

use crate::selection::RankedInstrument;

/// Overall result of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchVerdict {
    /// At least one recovery event was found.
    Matches,
    /// Instruments were analyzed but none produced a recovery event.
    NoMatches,
    /// Nothing could be analyzed (empty selection or every instrument failed).
    Failed,
}

/// Shape of the series an analysis ran on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesInfo {
    pub points: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub content_hash: String,
}

impl SeriesInfo {
    fn of(series: &PriceSeries) -> Self {
        let range = series.date_range();
        Self {
            points: series.len(),
            first_date: range.map(|(first, _)| first),
            last_date: range.map(|(_, last)| last),
            content_hash: series.content_hash(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyzedInstrument {
    /// Kept for presentation (dates by index); not exported.
    #[serde(skip)]
    pub series: PriceSeries,
    pub series_info: SeriesInfo,
    pub analysis: InstrumentAnalysis,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InstrumentOutcome {
    Analyzed(AnalyzedInstrument),
    /// No history could be obtained (provider error or empty response).
    Unavailable { reason: String },
    /// History was obtained but failed series validation.
    Rejected { reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct InstrumentResult {
    pub symbol: String,
    pub size_metric: Option<f64>,
    pub outcome: InstrumentOutcome,
}

impl InstrumentResult {
    pub fn analyzed(&self) -> Option<&AnalyzedInstrument> {
        match &self.outcome {
            InstrumentOutcome::Analyzed(a) => Some(a),
            _ => None,
        }
    }

    /// Why the instrument was not analyzed, if it wasn't.
    pub fn failure_reason(&self) -> Option<&str> {
        match &self.outcome {
            InstrumentOutcome::Analyzed(_) => None,
            InstrumentOutcome::Unavailable { reason } | InstrumentOutcome::Rejected { reason } => {
                Some(reason.as_str())
            }
        }
    }

    fn detail(&self) -> String {
        match &self.outcome {
            InstrumentOutcome::Analyzed(a) => format!(
                "{} points, {} drawdowns, {} recoveries",
                a.series_info.points,
                a.analysis.drawdowns.len(),
                a.analysis.recoveries.len()
            ),
            InstrumentOutcome::Unavailable { reason } => format!("unavailable: {reason}"),
            InstrumentOutcome::Rejected { reason } => format!("rejected: {reason}"),
        }
    }
}

/// Everything a batch produced, in input order.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub params: AnalysisParams,
    pub instruments: Vec<InstrumentResult>,
}

impl BatchReport {
    pub fn new(params: AnalysisParams, instruments: Vec<InstrumentResult>) -> Self {
        Self {
            params,
            instruments,
        }
    }

    pub fn verdict(&self) -> BatchVerdict {
        if self.analyzed_count() == 0 {
            BatchVerdict::Failed
        } else if self.total_recoveries() > 0 {
            BatchVerdict::Matches
        } else {
            BatchVerdict::NoMatches
        }
    }

    pub fn analyzed(&self) -> impl Iterator<Item = (&InstrumentResult, &AnalyzedInstrument)> {
        self.instruments
            .iter()
            .filter_map(|r| r.analyzed().map(|a| (r, a)))
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.instruments
            .iter()
            .filter_map(|r| r.failure_reason().map(|reason| (r.symbol.as_str(), reason)))
    }

    pub fn analyzed_count(&self) -> usize {
        self.analyzed().count()
    }

    pub fn failed_count(&self) -> usize {
        self.instruments.len() - self.analyzed_count()
    }

    pub fn total_drawdowns(&self) -> usize {
        self.analyzed().map(|(_, a)| a.analysis.drawdowns.len()).sum()
    }

    pub fn total_recoveries(&self) -> usize {
        self.analyzed().map(|(_, a)| a.analysis.recoveries.len()).sum()
    }
}

/// Turn one fetch outcome into an instrument result.
pub fn analyze_outcome(
    symbol: &str,
    size_metric: Option<f64>,
    outcome: FetchOutcome,
    params: &AnalysisParams,
) -> InstrumentResult {
    let outcome = match outcome {
        FetchOutcome::Series(series) => {
            let analysis = analyze_series(&series, params);
            InstrumentOutcome::Analyzed(AnalyzedInstrument {
                series_info: SeriesInfo::of(&series),
                series,
                analysis,
            })
        }
        FetchOutcome::Empty => InstrumentOutcome::Unavailable {
            reason: "no price history returned".into(),
        },
        FetchOutcome::Failed(DataError::Quality(e)) => {
            tracing::warn!(symbol, error = %e, "rejecting series");
            InstrumentOutcome::Rejected {
                reason: e.to_string(),
            }
        }
        FetchOutcome::Failed(e) => {
            tracing::warn!(symbol, error = %e, "no history");
            InstrumentOutcome::Unavailable {
                reason: e.to_string(),
            }
        }
    };

    InstrumentResult {
        symbol: symbol.to_string(),
        size_metric,
        outcome,
    }
}

/// Runs the per-instrument pipeline over a selection.
pub struct BatchRunner<'a> {
    provider: &'a dyn DataProvider,
    params: AnalysisParams,
    parallel: bool,
    progress: Option<&'a dyn BatchProgress>,
}

impl<'a> BatchRunner<'a> {
    /// Fails if the parameters are invalid; nothing is fetched in that case.
    pub fn new(provider: &'a dyn DataProvider, params: AnalysisParams) -> Result<Self, ParamsError> {
        params.validate()?;
        Ok(Self {
            provider,
            params,
            parallel: true,
            progress: None,
        })
    }

    /// Enables or disables parallel execution.
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_progress(mut self, progress: &'a dyn BatchProgress) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn params(&self) -> &AnalysisParams {
        &self.params
    }

    /// Fetch and analyze every instrument over `[start, end]`.
    pub fn run(
        &self,
        instruments: &[RankedInstrument],
        start: NaiveDate,
        end: NaiveDate,
    ) -> BatchReport {
        let total = instruments.len();
        tracing::info!(
            total,
            provider = self.provider.name(),
            parallel = self.parallel,
            %start,
            %end,
            "starting batch"
        );

        let results: Vec<InstrumentResult> = if self.parallel {
            instruments
                .par_iter()
                .enumerate()
                .map(|(idx, inst)| self.run_one(idx, total, inst, start, end))
                .collect()
        } else {
            instruments
                .iter()
                .enumerate()
                .map(|(idx, inst)| self.run_one(idx, total, inst, start, end))
                .collect()
        };

        let report = BatchReport::new(self.params, results);
        if let Some(p) = self.progress {
            p.on_batch_complete(report.analyzed_count(), report.failed_count(), total);
        }
        report
    }

    fn run_one(
        &self,
        idx: usize,
        total: usize,
        inst: &RankedInstrument,
        start: NaiveDate,
        end: NaiveDate,
    ) -> InstrumentResult {
        if let Some(p) = self.progress {
            p.on_start(&inst.symbol, idx, total);
        }

        let outcome = FetchOutcome::fetch(self.provider, &inst.symbol, start, end);
        let result = analyze_outcome(&inst.symbol, Some(inst.size_metric), outcome, &self.params);

        if let Some(p) = self.progress {
            p.on_complete(&inst.symbol, idx, total, &result.detail());
        }
        result
    }
}
