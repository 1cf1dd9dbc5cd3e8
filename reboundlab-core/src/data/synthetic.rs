//! Synthetic data provider for offline runs and tests.
//!
//! Produces a seeded random walk per symbol. The seed is the BLAKE3 hash of
//! the symbol, so the same symbol and date range always yield the same bars.
//! Results built on synthetic data are tagged by [`DataSource::Synthetic`].

use super::provider::{DataError, DataProvider, DataSource, FetchResult, RawBar};
use chrono::{Datelike, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    start_price: f64,
    /// Max absolute daily return of the walk; zero gives a flat series.
    daily_range: f64,
}

impl Default for SyntheticProvider {
    fn default() -> Self {
        Self {
            start_price: 100.0,
            daily_range: 0.03,
        }
    }
}

impl SyntheticProvider {
    /// A negative `daily_range` is taken as its magnitude.
    pub fn new(start_price: f64, daily_range: f64) -> Self {
        Self {
            start_price,
            daily_range: daily_range.abs(),
        }
    }

    fn rng_for(symbol: &str, salt: &str) -> StdRng {
        let mut hasher = blake3::Hasher::new();
        hasher.update(symbol.as_bytes());
        hasher.update(salt.as_bytes());
        StdRng::from_seed(*hasher.finalize().as_bytes())
    }

    /// Weekday bars from `start` to `end` inclusive.
    pub fn generate(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Vec<RawBar> {
        let mut rng = Self::rng_for(symbol, "history");
        let mut bars = Vec::new();
        let mut price = self.start_price;
        let mut current = start;
        let range = self.daily_range;

        while current <= end {
            let weekday = current.weekday();
            if weekday != chrono::Weekday::Sat && weekday != chrono::Weekday::Sun {
                let daily_return: f64 = rng.gen_range(-range..=range);
                price *= 1.0 + daily_return;
                bars.push(RawBar {
                    date: current,
                    close: price,
                    adj_close: price,
                });
            }
            current += chrono::Duration::days(1);
        }

        bars
    }
}

impl DataProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        tracing::warn!(symbol, "generating synthetic history; results are not market data");
        Ok(FetchResult {
            symbol: symbol.to_string(),
            bars: self.generate(symbol, start, end),
            source: DataSource::Synthetic,
        })
    }

    /// Between 1 and 500 billion, fixed per symbol.
    fn fetch_size_metric(&self, symbol: &str) -> Result<f64, DataError> {
        let mut rng = Self::rng_for(symbol, "size");
        Ok(rng.gen_range(1.0e9..5.0e11))
    }

    fn is_available(&self) -> bool {
        true
    }
}
