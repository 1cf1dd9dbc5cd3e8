//! Price series — the immutable, index-addressable input to every scan.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single daily closing price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }
}

/// Data-quality violations detected when a series is constructed.
///
/// Any of these is fatal for the instrument that produced the series.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("{symbol}: non-positive price {price} on {date} (index {index})")]
    NonPositivePrice {
        symbol: String,
        index: usize,
        date: NaiveDate,
        price: f64,
    },

    #[error("{symbol}: non-finite price on {date} (index {index})")]
    NonFinitePrice {
        symbol: String,
        index: usize,
        date: NaiveDate,
    },

    #[error("{symbol}: duplicate timestamp {date} at index {index}")]
    DuplicateTimestamp {
        symbol: String,
        index: usize,
        date: NaiveDate,
    },

    #[error("{symbol}: timestamp {current} at index {index} precedes {previous}")]
    NonMonotonicTimestamp {
        symbol: String,
        index: usize,
        previous: NaiveDate,
        current: NaiveDate,
    },
}

/// Chronologically ordered closing prices for one instrument.
///
/// Invariants, enforced by [`PriceSeries::new`]:
/// - timestamps strictly increase (no duplicates, no reordering)
/// - every price is finite and > 0
///
/// The points are never mutated after construction, so an index into a
/// series stays valid for the lifetime of every event derived from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Validate and wrap a list of points.
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> Result<Self, SeriesError> {
        let symbol = symbol.into();

        for (index, point) in points.iter().enumerate() {
            if !point.price.is_finite() {
                return Err(SeriesError::NonFinitePrice {
                    symbol,
                    index,
                    date: point.date,
                });
            }
            if point.price <= 0.0 {
                return Err(SeriesError::NonPositivePrice {
                    symbol,
                    index,
                    date: point.date,
                    price: point.price,
                });
            }
            if index > 0 {
                let previous = points[index - 1].date;
                if point.date == previous {
                    return Err(SeriesError::DuplicateTimestamp {
                        symbol,
                        index,
                        date: point.date,
                    });
                }
                if point.date < previous {
                    return Err(SeriesError::NonMonotonicTimestamp {
                        symbol,
                        index,
                        previous,
                        current: point.date,
                    });
                }
            }
        }

        Ok(Self { symbol, points })
    }

    /// A series with no history. Scans over it yield no events.
    pub fn empty(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            points: Vec::new(),
        }
    }

    /// Build a series from closes on consecutive calendar days starting at `start`.
    ///
    /// Convenient for fixtures where only positions matter.
    pub fn from_closes(
        symbol: impl Into<String>,
        start: NaiveDate,
        closes: &[f64],
    ) -> Result<Self, SeriesError> {
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &price)| PricePoint::new(start + chrono::Duration::days(i as i64), price))
            .collect();
        Self::new(symbol, points)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn get(&self, index: usize) -> Option<&PricePoint> {
        self.points.get(index)
    }

    /// Price at `index`. Panics if out of range, like slice indexing.
    pub fn price(&self, index: usize) -> f64 {
        self.points[index].price
    }

    /// Date at `index`. Panics if out of range, like slice indexing.
    pub fn date(&self, index: usize) -> NaiveDate {
        self.points[index].date
    }

    /// Index of the last point, or `None` for an empty series.
    pub fn last_index(&self) -> Option<usize> {
        self.points.len().checked_sub(1)
    }

    /// First and last dates covered, if any.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }

    /// Deterministic BLAKE3 hash over symbol, dates and prices.
    pub fn content_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.symbol.as_bytes());
        for point in &self.points {
            hasher.update(point.date.to_string().as_bytes());
            hasher.update(&point.price.to_le_bytes());
        }
        hasher.finalize().to_hex().to_string()
    }
}
