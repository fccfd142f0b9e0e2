//! Text report printer.
//!
//! Everything here goes to stdout because the tables are the product of the
//! run, not diagnostics. Pipeline progress is logged through `tracing`
//! elsewhere; this module only formats already-computed values.

use crate::data::{CleanRecord, MissingValueCounts};
use crate::stats::aggregator::Summaries;
use crate::stats::ColumnStats;
use chrono::NaiveDate;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Print the full text report: overview, summary tables, descriptive stats
/// and the correlation matrix.
pub fn print_report(
    records: &[CleanRecord],
    missing_before: &MissingValueCounts,
    duplicate_rows: usize,
    column_stats: &[ColumnStats],
    summaries: &Summaries,
) {
    print_overview(records, missing_before, duplicate_rows);
    print_region_totals(summaries);
    print_yearly_trends(summaries);
    print_state_totals(summaries);
    print_monthly_averages(summaries);
    print_top_states_growth(summaries);
    print_describe(column_stats);
    print_correlation(summaries);
}

fn print_overview(records: &[CleanRecord], missing: &MissingValueCounts, duplicate_rows: usize) {
    println!("=== Dataset Overview ===");
    println!("cleaned rows: {}", records.len());
    println!(
        "missing values before cleaning: region={} wind={} solar={} other={}",
        missing.region, missing.wind_energy, missing.solar_energy, missing.other_renewable_energy
    );
    println!("duplicate rows: {duplicate_rows}");
    if let Some((earliest, latest)) = date_range(records) {
        println!("date range: {earliest} to {latest}");
    }
    println!();
}

/// Earliest and latest observation dates, regardless of source order.
fn date_range(records: &[CleanRecord]) -> Option<(NaiveDate, NaiveDate)> {
    let earliest = records.iter().map(|r| r.date).min()?;
    let latest = records.iter().map(|r| r.date).max()?;
    Some((earliest, latest))
}

fn print_region_totals(summaries: &Summaries) {
    println!("=== Renewable Energy by Region ===");
    println!(
        "{:<16} {:>12} {:>12} {:>12} {:>12}",
        "Region", "Wind", "Solar", "Other", "Total"
    );
    for row in &summaries.region_totals {
        println!(
            "{:<16} {:>12.2} {:>12.2} {:>12.2} {:>12.2}",
            row.region, row.energy.wind, row.energy.solar, row.energy.other, row.energy.total
        );
    }
    println!();
}

fn print_yearly_trends(summaries: &Summaries) {
    println!("=== Yearly Trends ===");
    println!(
        "{:<6} {:>12} {:>12} {:>12} {:>12}",
        "Year", "Wind", "Solar", "Other", "Total"
    );
    for row in &summaries.yearly_trends {
        println!(
            "{:<6} {:>12.2} {:>12.2} {:>12.2} {:>12.2}",
            row.year, row.energy.wind, row.energy.solar, row.energy.other, row.energy.total
        );
    }
    println!();
}

fn print_state_totals(summaries: &Summaries) {
    println!("=== Top 10 States by Renewable Energy ===");
    println!("{:<24} {:>14}", "State", "Total");
    for row in summaries.state_totals.iter().take(10) {
        println!("{:<24} {:>14.2}", row.state_name, row.total);
    }
    println!();
}

fn print_monthly_averages(summaries: &Summaries) {
    println!("=== Average Monthly Renewable Energy ===");
    println!("{:<6} {:>14}", "Month", "Mean Total");
    for row in &summaries.monthly_averages {
        let name = MONTH_NAMES
            .get(row.month as usize - 1)
            .copied()
            .unwrap_or("?");
        println!("{:<6} {:>14.2}", name, row.mean_total);
    }
    println!();
}

fn print_top_states_growth(summaries: &Summaries) {
    let growth = &summaries.top_states_growth;
    println!("=== Growth of Top {} States ===", summaries.top_n);
    print!("{:<24}", "State");
    for year in &growth.years {
        print!(" {:>12}", year);
    }
    println!();
    for series in &growth.series {
        print!("{:<24}", series.state_name);
        for year in &growth.years {
            match series.total_by_year.get(year) {
                Some(total) => print!(" {:>12.2}", total),
                None => print!(" {:>12}", "-"),
            }
        }
        println!();
    }
    println!();
}

fn print_describe(column_stats: &[ColumnStats]) {
    println!("=== Statistical Summary ===");
    println!(
        "{:<26} {:>8} {:>12} {:>12} {:>12} {:>12} {:>12}",
        "Column", "Count", "Mean", "Std", "Min", "Median", "Max"
    );
    for stats in column_stats {
        println!(
            "{:<26} {:>8} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>12.2}",
            stats.column, stats.count, stats.mean, stats.std, stats.min, stats.median, stats.max
        );
    }
    println!();
}

fn print_correlation(summaries: &Summaries) {
    let matrix = &summaries.correlation;
    println!("=== Correlation Between Energy Types ===");
    print!("{:<26}", "");
    for label in matrix.labels {
        print!(" {:>24}", label);
    }
    println!();
    for (i, label) in matrix.labels.iter().enumerate() {
        print!("{:<26}", label);
        for j in 0..matrix.labels.len() {
            print!(" {:>24.3}", matrix.values[i][j]);
        }
        println!();
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(state: &str, date: &str) -> CleanRecord {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("valid date");
        CleanRecord {
            state_name: state.to_string(),
            region: "South".to_string(),
            date,
            year: 2021,
            month: 1,
            wind_energy: 1.0,
            solar_energy: 1.0,
            other_renewable_energy: 0.0,
            total_renewable_energy: 2.0,
        }
    }

    #[test]
    fn date_range_spans_unsorted_records() {
        let records = vec![
            record("A", "2021-06-01"),
            record("B", "2019-03-01"),
            record("C", "2022-11-01"),
            record("D", "2020-01-01"),
        ];

        let (earliest, latest) = date_range(&records).expect("range");
        assert_eq!(earliest, NaiveDate::from_ymd_opt(2019, 3, 1).unwrap());
        assert_eq!(latest, NaiveDate::from_ymd_opt(2022, 11, 1).unwrap());
    }

    #[test]
    fn date_range_of_empty_table_is_none() {
        assert!(date_range(&[]).is_none());
    }
}
