//! Renewscope - regional renewable-energy CSV analysis & report generation.
//!
//! A one-shot pipeline: load a CSV snapshot, clean it, compute the summary
//! tables, print them and render chart images. Strictly linear, with each
//! stage a pure function of the previous stage's output:
//! loader -> cleaner -> aggregator -> reporter.

pub mod data;
pub mod report;
pub mod stats;
