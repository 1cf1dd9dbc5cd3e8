//! CSV import of daily closes.
//!
//! Accepts the minimal `date,close` layout as well as Yahoo-style exports
//! (`Date,Open,High,Low,Close,Adj Close,Volume`). Unknown columns are
//! ignored; unparseable price cells (`null`, blanks) become void bars.

use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;

use super::provider::{closing_series, DataError, RawBar};
use crate::domain::PriceSeries;

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "Date")]
    date: NaiveDate,
    #[serde(alias = "Close", default, deserialize_with = "csv::invalid_option")]
    close: Option<f64>,
    #[serde(
        alias = "Adj Close",
        alias = "adj close",
        default,
        deserialize_with = "csv::invalid_option"
    )]
    adj_close: Option<f64>,
}

/// Read bars from any CSV source with a header row.
pub fn read_bars<R: Read>(reader: R) -> Result<Vec<RawBar>, DataError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut bars = Vec::new();
    for (line, row) in rdr.deserialize::<CsvRow>().enumerate() {
        let row = row.map_err(|e| DataError::Csv(format!("row {}: {e}", line + 1)))?;
        bars.push(RawBar {
            date: row.date,
            close: row.close.unwrap_or(f64::NAN),
            adj_close: row.adj_close.unwrap_or(f64::NAN),
        });
    }
    Ok(bars)
}

/// Load a CSV file into a validated closing-price series for `symbol`.
pub fn load_series_csv(path: &Path, symbol: &str) -> Result<PriceSeries, DataError> {
    let file = std::fs::File::open(path)
        .map_err(|e| DataError::Csv(format!("open {}: {e}", path.display())))?;
    let bars = read_bars(file)?;
    tracing::debug!(symbol, rows = bars.len(), path = %path.display(), "read csv");
    Ok(closing_series(symbol, &bars)?)
}
