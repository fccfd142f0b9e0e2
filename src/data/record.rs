//! Core row types for the renewable-energy dataset.

use chrono::NaiveDate;
use serde::Deserialize;

/// National-total rollup rows carry this state name. They are kept in the
/// cleaned table but excluded from every aggregate, since counting them
/// alongside real states would double the national totals.
pub const ALL_INDIA: &str = "All India";

/// Sentinel region for states that never appear with a known region.
pub const UNKNOWN_REGION: &str = "Unknown";

/// Direct serde mapping of one CSV row.
///
/// `region` and the three energy components are nullable in the source.
/// `date` stays an unparsed string here; parsing it is the cleaner's job.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawRecord {
    pub state_name: String,
    pub region: Option<String>,
    pub date: String,
    pub wind_energy: Option<f64>,
    pub solar_energy: Option<f64>,
    pub other_renewable_energy: Option<f64>,
    pub total_renewable_energy: f64,
}

/// One fully cleaned observation: region resolved, missing components
/// zero-filled, date parsed and the calendar fields derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanRecord {
    pub state_name: String,
    pub region: String,
    pub date: NaiveDate,
    pub year: i32,
    /// 1-12, always consistent with `date`.
    pub month: u32,
    pub wind_energy: f64,
    pub solar_energy: f64,
    pub other_renewable_energy: f64,
    pub total_renewable_energy: f64,
}

impl CleanRecord {
    /// True for the national rollup rows that aggregates must skip.
    pub fn is_national_rollup(&self) -> bool {
        self.state_name == ALL_INDIA
    }
}
