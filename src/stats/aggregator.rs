//! Aggregation over the cleaned table.
//!
//! Every summary here is a pure function of the frozen table and excludes
//! the "All India" national rollup rows before grouping. Group keys keep
//! first-seen source order unless a summary is explicitly sorted, so ranked
//! outputs break ties by original state ordering.

use crate::data::record::ALL_INDIA;
use crate::data::CleanRecord;
use crate::stats::calculator::{pearson, ENERGY_COLUMNS};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
#[error("no records left for the '{summary}' summary after excluding '{ALL_INDIA}' rows")]
pub struct EmptyDatasetError {
    pub summary: &'static str,
}

/// Summed energy columns for one group key.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EnergyTotals {
    pub wind: f64,
    pub solar: f64,
    pub other: f64,
    pub total: f64,
}

impl EnergyTotals {
    fn add(&mut self, record: &CleanRecord) {
        self.wind += record.wind_energy;
        self.solar += record.solar_energy;
        self.other += record.other_renewable_energy;
        self.total += record.total_renewable_energy;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegionTotals {
    pub region: String,
    pub energy: EnergyTotals,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearTotals {
    pub year: i32,
    pub energy: EnergyTotals,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StateTotal {
    pub state_name: String,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyAverage {
    /// 1-12.
    pub month: u32,
    pub mean_total: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StateAverage {
    pub state_name: String,
    pub mean_total: f64,
}

/// All total-energy observations for one region, in source order. Feeds the
/// per-region distribution boxplot.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionDistribution {
    pub region: String,
    pub totals: Vec<f64>,
}

/// One top state's total by year.
#[derive(Debug, Clone, PartialEq)]
pub struct StateGrowth {
    pub state_name: String,
    pub total_by_year: BTreeMap<i32, f64>,
}

/// Yearly growth series for the top-N states by summed total, in rank order.
#[derive(Debug, Clone, PartialEq)]
pub struct TopStatesGrowth {
    pub years: Vec<i32>,
    pub series: Vec<StateGrowth>,
}

/// Pairwise Pearson correlations over the four energy columns, indexed in
/// [`ENERGY_COLUMNS`] order.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub labels: [&'static str; 4],
    pub values: [[f64; 4]; 4],
}

/// All summary tables the reporter consumes, computed independently.
#[derive(Debug, Clone)]
pub struct Summaries {
    pub region_totals: Vec<RegionTotals>,
    pub yearly_trends: Vec<YearTotals>,
    pub state_totals: Vec<StateTotal>,
    pub state_averages: Vec<StateAverage>,
    pub monthly_averages: Vec<MonthlyAverage>,
    pub top_states_growth: TopStatesGrowth,
    pub region_distributions: Vec<RegionDistribution>,
    pub correlation: CorrelationMatrix,
    pub top_n: usize,
}

fn eligible(records: &[CleanRecord]) -> Vec<&CleanRecord> {
    records.iter().filter(|r| !r.is_national_rollup()).collect()
}

fn require_rows<'a>(
    records: &'a [CleanRecord],
    summary: &'static str,
) -> Result<Vec<&'a CleanRecord>, EmptyDatasetError> {
    let rows = eligible(records);
    if rows.is_empty() {
        Err(EmptyDatasetError { summary })
    } else {
        Ok(rows)
    }
}

/// Sum of all four energy columns per region, regions in first-seen order.
pub fn region_totals(records: &[CleanRecord]) -> Result<Vec<RegionTotals>, EmptyDatasetError> {
    let rows = require_rows(records, "region totals")?;

    let mut order: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<RegionTotals> = Vec::new();
    for record in rows {
        let idx = *order.entry(record.region.as_str()).or_insert_with(|| {
            totals.push(RegionTotals {
                region: record.region.clone(),
                energy: EnergyTotals::default(),
            });
            totals.len() - 1
        });
        totals[idx].energy.add(record);
    }
    Ok(totals)
}

/// Sum of all four energy columns per year, ascending.
pub fn yearly_trends(records: &[CleanRecord]) -> Result<Vec<YearTotals>, EmptyDatasetError> {
    let rows = require_rows(records, "yearly trends")?;

    let mut by_year: BTreeMap<i32, EnergyTotals> = BTreeMap::new();
    for record in rows {
        by_year.entry(record.year).or_default().add(record);
    }
    Ok(by_year
        .into_iter()
        .map(|(year, energy)| YearTotals { year, energy })
        .collect())
}

/// Summed total per state, ranked descending. The sort is stable, so states
/// with equal totals keep their first-seen source order.
pub fn state_totals(records: &[CleanRecord]) -> Result<Vec<StateTotal>, EmptyDatasetError> {
    let rows = require_rows(records, "state totals")?;

    let mut order: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<StateTotal> = Vec::new();
    for record in rows {
        let idx = *order.entry(record.state_name.as_str()).or_insert_with(|| {
            totals.push(StateTotal {
                state_name: record.state_name.clone(),
                total: 0.0,
            });
            totals.len() - 1
        });
        totals[idx].total += record.total_renewable_energy;
    }

    totals.sort_by(|a, b| {
        b.total
            .partial_cmp(&a.total)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    Ok(totals)
}

/// Mean of the total column per state, ranked descending. Stable sort, so
/// equal means keep first-seen source order, same as [`state_totals`].
pub fn state_averages(records: &[CleanRecord]) -> Result<Vec<StateAverage>, EmptyDatasetError> {
    let rows = require_rows(records, "state averages")?;

    let mut order: HashMap<&str, usize> = HashMap::new();
    let mut sums: Vec<(String, f64, usize)> = Vec::new();
    for record in rows {
        let idx = *order.entry(record.state_name.as_str()).or_insert_with(|| {
            sums.push((record.state_name.clone(), 0.0, 0));
            sums.len() - 1
        });
        sums[idx].1 += record.total_renewable_energy;
        sums[idx].2 += 1;
    }

    let mut averages: Vec<StateAverage> = sums
        .into_iter()
        .map(|(state_name, sum, count)| StateAverage {
            state_name,
            mean_total: sum / count as f64,
        })
        .collect();
    averages.sort_by(|a, b| {
        b.mean_total
            .partial_cmp(&a.mean_total)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    Ok(averages)
}

/// Every total-column observation grouped by region, regions in first-seen
/// order. The reporter turns these into per-region box-and-whisker plots.
pub fn region_distributions(
    records: &[CleanRecord],
) -> Result<Vec<RegionDistribution>, EmptyDatasetError> {
    let rows = require_rows(records, "regional disparities")?;

    let mut order: HashMap<&str, usize> = HashMap::new();
    let mut distributions: Vec<RegionDistribution> = Vec::new();
    for record in rows {
        let idx = *order.entry(record.region.as_str()).or_insert_with(|| {
            distributions.push(RegionDistribution {
                region: record.region.clone(),
                totals: Vec::new(),
            });
            distributions.len() - 1
        });
        distributions[idx].totals.push(record.total_renewable_energy);
    }
    Ok(distributions)
}

/// Mean of the total column per calendar month. At most 12 entries, keyed
/// 1-12, only months present in the data appear.
pub fn monthly_averages(records: &[CleanRecord]) -> Result<Vec<MonthlyAverage>, EmptyDatasetError> {
    let rows = require_rows(records, "monthly averages")?;

    let mut sums: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
    for record in rows {
        let entry = sums.entry(record.month).or_insert((0.0, 0));
        entry.0 += record.total_renewable_energy;
        entry.1 += 1;
    }
    Ok(sums
        .into_iter()
        .map(|(month, (sum, count))| MonthlyAverage {
            month,
            mean_total: sum / count as f64,
        })
        .collect())
}

/// Yearly totals for the top `n` states by overall summed total.
///
/// The state set is exactly the first `n` entries of [`state_totals`], so
/// the growth chart and the ranking table can never disagree.
pub fn top_states_growth(
    records: &[CleanRecord],
    n: usize,
) -> Result<TopStatesGrowth, EmptyDatasetError> {
    let ranked = state_totals(records)?;
    let top: Vec<&str> = ranked
        .iter()
        .take(n)
        .map(|s| s.state_name.as_str())
        .collect();

    let mut series: Vec<StateGrowth> = top
        .iter()
        .map(|state| StateGrowth {
            state_name: state.to_string(),
            total_by_year: BTreeMap::new(),
        })
        .collect();
    let index: HashMap<&str, usize> = top.iter().enumerate().map(|(i, s)| (*s, i)).collect();

    let mut years: BTreeSet<i32> = BTreeSet::new();
    for record in eligible(records) {
        if let Some(&i) = index.get(record.state_name.as_str()) {
            *series[i].total_by_year.entry(record.year).or_insert(0.0) +=
                record.total_renewable_energy;
            years.insert(record.year);
        }
    }

    Ok(TopStatesGrowth {
        years: years.into_iter().collect(),
        series,
    })
}

/// Pairwise Pearson correlation matrix over the four energy columns.
pub fn correlation(records: &[CleanRecord]) -> Result<CorrelationMatrix, EmptyDatasetError> {
    let rows = require_rows(records, "energy-type correlation")?;

    let columns: Vec<Vec<f64>> = (0..ENERGY_COLUMNS.len())
        .map(|i| {
            rows.iter()
                .map(|r| match i {
                    0 => r.wind_energy,
                    1 => r.solar_energy,
                    2 => r.other_renewable_energy,
                    _ => r.total_renewable_energy,
                })
                .collect()
        })
        .collect();

    let mut values = [[0.0f64; 4]; 4];
    for (i, row) in values.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = pearson(&columns[i], &columns[j]);
        }
    }

    Ok(CorrelationMatrix {
        labels: ENERGY_COLUMNS,
        values,
    })
}

/// Compute every summary the reporter needs over the frozen table.
pub fn summarize(records: &[CleanRecord], top_n: usize) -> Result<Summaries, EmptyDatasetError> {
    let summaries = Summaries {
        region_totals: region_totals(records)?,
        yearly_trends: yearly_trends(records)?,
        state_totals: state_totals(records)?,
        state_averages: state_averages(records)?,
        monthly_averages: monthly_averages(records)?,
        top_states_growth: top_states_growth(records, top_n)?,
        region_distributions: region_distributions(records)?,
        correlation: correlation(records)?,
        top_n,
    };
    debug!(
        regions = summaries.region_totals.len(),
        years = summaries.yearly_trends.len(),
        states = summaries.state_totals.len(),
        months = summaries.monthly_averages.len(),
        "summaries computed"
    );
    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(state: &str, region: &str, year: i32, month: u32, totals: [f64; 4]) -> CleanRecord {
        let date = NaiveDate::from_ymd_opt(year, month, 1).expect("valid date");
        CleanRecord {
            state_name: state.to_string(),
            region: region.to_string(),
            date,
            year,
            month,
            wind_energy: totals[0],
            solar_energy: totals[1],
            other_renewable_energy: totals[2],
            total_renewable_energy: totals[3],
        }
    }

    fn sample() -> Vec<CleanRecord> {
        vec![
            record("Tamil Nadu", "South", 2020, 1, [10.0, 5.0, 1.0, 16.0]),
            record("Gujarat", "West", 2020, 2, [8.0, 6.0, 0.0, 14.0]),
            record("Tamil Nadu", "South", 2021, 1, [12.0, 7.0, 1.0, 20.0]),
            record("Karnataka", "South", 2021, 3, [4.0, 9.0, 2.0, 15.0]),
            record("All India", "Unknown", 2021, 3, [34.0, 27.0, 4.0, 65.0]),
        ]
    }

    #[test]
    fn region_totals_exclude_national_rollup() {
        let totals = region_totals(&sample()).expect("totals");
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].region, "South");
        assert!((totals[0].energy.total - 51.0).abs() < 1e-9);
        assert_eq!(totals[1].region, "West");
        assert!((totals[1].energy.wind - 8.0).abs() < 1e-9);
    }

    #[test]
    fn region_and_state_totals_agree() {
        let records = sample();
        let regions = region_totals(&records).expect("regions");
        let states = state_totals(&records).expect("states");

        let region_sum: f64 = regions.iter().map(|r| r.energy.total).sum();
        let state_sum: f64 = states.iter().map(|s| s.total).sum();
        assert!((region_sum - state_sum).abs() < 1e-9);
    }

    #[test]
    fn yearly_trends_ascend() {
        let trends = yearly_trends(&sample()).expect("trends");
        assert_eq!(trends.len(), 2);
        assert_eq!(trends[0].year, 2020);
        assert!((trends[0].energy.total - 30.0).abs() < 1e-9);
        assert_eq!(trends[1].year, 2021);
        assert!((trends[1].energy.total - 35.0).abs() < 1e-9);
    }

    #[test]
    fn state_totals_rank_descending_with_stable_ties() {
        let mut records = sample();
        records.push(record("Rajasthan", "North", 2020, 4, [0.0, 14.0, 0.0, 14.0]));

        let states = state_totals(&records).expect("states");
        let names: Vec<&str> = states.iter().map(|s| s.state_name.as_str()).collect();
        // Gujarat and Rajasthan tie at 14.0; Gujarat appeared first.
        assert_eq!(names, ["Tamil Nadu", "Karnataka", "Gujarat", "Rajasthan"]);
    }

    #[test]
    fn state_averages_rank_by_mean_not_by_sum() {
        let averages = state_averages(&sample()).expect("averages");
        let names: Vec<&str> = averages.iter().map(|s| s.state_name.as_str()).collect();
        // Tamil Nadu sums highest but averages (16+20)/2 = 18 across two rows.
        assert_eq!(names, ["Tamil Nadu", "Karnataka", "Gujarat"]);
        assert!((averages[0].mean_total - 18.0).abs() < 1e-9);
        assert!((averages[1].mean_total - 15.0).abs() < 1e-9);
        assert!(averages.iter().all(|s| s.state_name != "All India"));
    }

    #[test]
    fn region_distributions_keep_every_observation() {
        let distributions = region_distributions(&sample()).expect("distributions");
        assert_eq!(distributions.len(), 2);
        assert_eq!(distributions[0].region, "South");
        assert_eq!(distributions[0].totals, vec![16.0, 20.0, 15.0]);
        assert_eq!(distributions[1].region, "West");
        assert_eq!(distributions[1].totals, vec![14.0]);
    }

    #[test]
    fn monthly_averages_stay_in_calendar_domain() {
        let averages = monthly_averages(&sample()).expect("averages");
        assert!(averages.len() <= 12);
        assert!(averages.iter().all(|m| (1..=12).contains(&m.month)));

        let january = averages.iter().find(|m| m.month == 1).expect("january");
        assert!((january.mean_total - 18.0).abs() < 1e-9);
    }

    #[test]
    fn top_states_growth_matches_ranking() {
        let records = sample();
        let growth = top_states_growth(&records, 2).expect("growth");
        let ranked = state_totals(&records).expect("states");

        let growth_states: Vec<&str> = growth
            .series
            .iter()
            .map(|s| s.state_name.as_str())
            .collect();
        let top_ranked: Vec<&str> = ranked
            .iter()
            .take(2)
            .map(|s| s.state_name.as_str())
            .collect();
        assert_eq!(growth_states, top_ranked);

        let tamil_nadu = &growth.series[0];
        assert_eq!(tamil_nadu.total_by_year.get(&2020), Some(&16.0));
        assert_eq!(tamil_nadu.total_by_year.get(&2021), Some(&20.0));
        assert_eq!(growth.years, vec![2020, 2021]);
    }

    #[test]
    fn correlation_diagonal_is_unity() {
        let matrix = correlation(&sample()).expect("correlation");
        for i in 0..4 {
            assert!((matrix.values[i][i] - 1.0).abs() < 1e-9);
            for j in 0..4 {
                let difference = matrix.values[i][j] - matrix.values[j][i];
                assert!(difference.abs() < 1e-12);
            }
        }
    }

    #[test]
    fn rollup_only_dataset_is_empty() {
        let records = vec![record("All India", "Unknown", 2020, 1, [1.0, 1.0, 1.0, 3.0])];

        assert!(state_totals(&records).is_err());
        assert!(region_totals(&records).is_err());
        let err = correlation(&records).unwrap_err();
        assert_eq!(err.summary, "energy-type correlation");
    }
}
