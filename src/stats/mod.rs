//! Stats module - aggregation and statistical helpers

pub mod aggregator;
pub mod calculator;

pub use aggregator::{summarize, EmptyDatasetError, Summaries};
pub use calculator::{describe, ColumnStats};
