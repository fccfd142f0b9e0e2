//! Data module - CSV loading and cleaning

pub mod cleaner;
pub mod loader;
pub mod record;

pub use cleaner::{clean, DateParseError, MissingValueCounts, StateRegionMap};
pub use loader::{load_records, DataSourceError};
pub use record::{CleanRecord, RawRecord};
