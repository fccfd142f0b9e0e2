//! Cleaning pass: missing-value repair and calendar-field derivation.
//!
//! Region resolution is "first seen wins": the map keeps the region of a
//! state's first occurrence in source order and ignores later ones. This
//! mirrors how the source dataset was deduplicated and may be a data-quality
//! artifact rather than a deliberate policy; if one state legitimately spans
//! regions over time, the later regions are silently dropped here.

use crate::data::record::{CleanRecord, RawRecord, UNKNOWN_REGION};
use chrono::{Datelike, NaiveDate};
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::{debug, warn};

/// Lookup from state name to its resolved region.
pub type StateRegionMap = HashMap<String, String>;

/// Date formats observed in the source snapshots.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d-%m-%Y", "%Y/%m/%d"];

#[derive(Error, Debug)]
#[error("row {row}: cannot parse date '{value}' for state '{state_name}'")]
pub struct DateParseError {
    pub row: usize,
    pub state_name: String,
    pub value: String,
}

/// Missing-value counts over the raw table, printed as part of the report
/// overview before cleaning repairs them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MissingValueCounts {
    pub region: usize,
    pub wind_energy: usize,
    pub solar_energy: usize,
    pub other_renewable_energy: usize,
}

pub fn missing_value_counts(records: &[RawRecord]) -> MissingValueCounts {
    let mut counts = MissingValueCounts::default();
    for record in records {
        counts.region += record.region.is_none() as usize;
        counts.wind_energy += record.wind_energy.is_none() as usize;
        counts.solar_energy += record.solar_energy.is_none() as usize;
        counts.other_renewable_energy += record.other_renewable_energy.is_none() as usize;
    }
    counts
}

/// Count rows that are exact copies of an earlier row, across all columns.
/// Reported in the overview next to the missing-value counts; cleaning
/// keeps the duplicates.
pub fn duplicate_row_count(records: &[RawRecord]) -> usize {
    let mut seen = HashSet::new();
    records.iter().filter(|r| !seen.insert(row_key(r))).count()
}

type RowKey = (
    String,
    Option<String>,
    String,
    Option<u64>,
    Option<u64>,
    Option<u64>,
    u64,
);

// Floats keyed by bit pattern so identical text rows always collide.
fn row_key(record: &RawRecord) -> RowKey {
    (
        record.state_name.clone(),
        record.region.clone(),
        record.date.clone(),
        record.wind_energy.map(f64::to_bits),
        record.solar_energy.map(f64::to_bits),
        record.other_renewable_energy.map(f64::to_bits),
        record.total_renewable_energy.to_bits(),
    )
}

/// Build the state-to-region lookup from all rows carrying a region.
pub fn build_state_region_map(records: &[RawRecord]) -> StateRegionMap {
    let mut map = StateRegionMap::new();
    for record in records {
        if let Some(region) = &record.region {
            map.entry(record.state_name.clone())
                .or_insert_with(|| region.clone());
        }
    }
    map
}

/// Clean the raw table in source order and derive the calendar fields.
///
/// Repairs applied, and the only silent substitutions in the pipeline:
/// missing regions resolve through the state-region map (falling back to
/// `"Unknown"`), and missing energy components become `0.0`. Unparseable
/// dates abort the run with a [`DateParseError`] naming the offending row.
///
/// Returns the cleaned table plus the state-region map for diagnostics.
/// Cleaning already-clean data is a no-op.
pub fn clean(records: Vec<RawRecord>) -> Result<(Vec<CleanRecord>, StateRegionMap), DateParseError> {
    let state_region_map = build_state_region_map(&records);
    let mut unknown_regions = 0usize;
    let mut cleaned = Vec::with_capacity(records.len());

    for (idx, record) in records.into_iter().enumerate() {
        let region = match record.region {
            Some(region) => region,
            None => match state_region_map.get(&record.state_name) {
                Some(region) => region.clone(),
                None => {
                    unknown_regions += 1;
                    UNKNOWN_REGION.to_string()
                }
            },
        };

        let date = parse_date(&record.date).ok_or_else(|| DateParseError {
            row: idx + 2,
            state_name: record.state_name.clone(),
            value: record.date.clone(),
        })?;

        cleaned.push(CleanRecord {
            state_name: record.state_name,
            region,
            year: date.year(),
            month: date.month(),
            date,
            wind_energy: record.wind_energy.unwrap_or(0.0),
            solar_energy: record.solar_energy.unwrap_or(0.0),
            other_renewable_energy: record.other_renewable_energy.unwrap_or(0.0),
            total_renewable_energy: record.total_renewable_energy,
        });
    }

    if unknown_regions > 0 {
        warn!(
            count = unknown_regions,
            "rows fell back to the '{UNKNOWN_REGION}' region"
        );
    }
    debug!(
        rows = cleaned.len(),
        states = state_region_map.len(),
        "cleaning complete"
    );

    Ok((cleaned, state_region_map))
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}
