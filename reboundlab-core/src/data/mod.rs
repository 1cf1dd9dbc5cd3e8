//! Market-data boundary: providers, import, and the candidate universe.

pub mod circuit_breaker;
pub mod csv_import;
pub mod provider;
pub mod synthetic;
pub mod universe;
pub mod yahoo;

pub use circuit_breaker::CircuitBreaker;
pub use csv_import::{load_series_csv, read_bars};
pub use provider::{
    closing_series, BatchProgress, DataError, DataProvider, DataSource, FetchOutcome,
    FetchResult, LogProgress, RawBar,
};
pub use synthetic::SyntheticProvider;
pub use universe::Universe;
pub use yahoo::YahooProvider;
