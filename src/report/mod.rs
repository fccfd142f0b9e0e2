//! Report module - text output and chart rendering

pub mod charts;
pub mod printer;

pub use charts::{render_all, ReportError};
pub use printer::print_report;
