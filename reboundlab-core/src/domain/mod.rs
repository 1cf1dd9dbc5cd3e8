//! Domain types for ReboundLab

pub mod events;
pub mod price;

pub use events::{relative_change, DrawdownEvent, RecoveryEvent};
pub use price::{PricePoint, PriceSeries, SeriesError};
