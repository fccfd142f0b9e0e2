//! End-to-end pipeline test: write a CSV snapshot, then load, clean and
//! aggregate it the same way the binary does.

use renewscope::data::{clean, load_records};
use renewscope::stats::aggregator;
use std::io::Write;
use tempfile::NamedTempFile;

const HEADER: &str =
    "state_name,region,date,wind_energy,solar_energy,other_renewable_energy,total_renewable_energy";

fn write_csv(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    writeln!(file, "{HEADER}").expect("header");
    for row in rows {
        writeln!(file, "{row}").expect("row");
    }
    file
}

#[test]
fn full_pipeline_over_small_snapshot() {
    let file = write_csv(&[
        "Tamil Nadu,South,2020-01-01,10.0,5.0,1.0,16.0",
        "Gujarat,West,2020-02-01,8.0,6.0,,14.0",
        "Tamil Nadu,,2021-01-01,12.0,7.0,1.0,20.0",
        "Karnataka,South,2021-03-01,4.0,9.0,2.0,15.0",
        "Mystery State,,2021-03-01,,1.0,,1.0",
        "All India,,2021-03-01,34.0,28.0,4.0,66.0",
    ]);

    let raw = load_records(file.path()).expect("load");
    assert_eq!(raw.len(), 6);

    let (records, state_region_map) = clean(raw).expect("clean");

    // Cleaning invariants: every region resolved, no missing components.
    assert!(records.iter().all(|r| !r.region.is_empty()));
    assert!(records.iter().all(|r| r.wind_energy >= 0.0
        && r.solar_energy >= 0.0
        && r.other_renewable_energy >= 0.0));
    assert_eq!(records[2].region, "South");
    assert_eq!(records[4].region, "Unknown");
    assert_eq!((records[2].year, records[2].month), (2021, 1));
    assert_eq!(
        state_region_map.get("Tamil Nadu").map(String::as_str),
        Some("South")
    );
    // "All India" never appears with a region, so it resolves to Unknown too.
    assert_eq!(records[5].region, "Unknown");

    let summaries = aggregator::summarize(&records, 3).expect("summaries");

    // The rollup row is excluded everywhere: per-state totals cover exactly
    // the four real states.
    assert_eq!(summaries.state_totals.len(), 4);
    assert!(summaries
        .state_totals
        .iter()
        .all(|s| s.state_name != "All India"));

    // Sum law: region totals and state totals add up to the same grand total.
    let by_region: f64 = summaries.region_totals.iter().map(|r| r.energy.total).sum();
    let by_state: f64 = summaries.state_totals.iter().map(|s| s.total).sum();
    assert!((by_region - by_state).abs() < 1e-9);
    assert!((by_state - 66.0).abs() < 1e-9);

    // Ranked order.
    assert_eq!(summaries.state_totals[0].state_name, "Tamil Nadu");
    assert!((summaries.state_totals[0].total - 36.0).abs() < 1e-9);

    // Monthly averages stay inside the calendar domain.
    assert!(summaries.monthly_averages.len() <= 12);
    assert!(summaries
        .monthly_averages
        .iter()
        .all(|m| (1..=12).contains(&m.month)));

    // Growth summary covers exactly the top N of the ranking.
    let growth_states: Vec<&str> = summaries
        .top_states_growth
        .series
        .iter()
        .map(|s| s.state_name.as_str())
        .collect();
    let ranked_top: Vec<&str> = summaries
        .state_totals
        .iter()
        .take(3)
        .map(|s| s.state_name.as_str())
        .collect();
    assert_eq!(growth_states, ranked_top);

    // State averages rank by per-row mean, rollup excluded.
    assert_eq!(summaries.state_averages[0].state_name, "Tamil Nadu");
    assert!((summaries.state_averages[0].mean_total - 18.0).abs() < 1e-9);
    assert!(summaries
        .state_averages
        .iter()
        .all(|s| s.state_name != "All India"));

    // Region distributions cover every non-rollup observation.
    let observations: usize = summaries
        .region_distributions
        .iter()
        .map(|d| d.totals.len())
        .sum();
    assert_eq!(observations, 5);

    // Correlation matrix is symmetric with a unit diagonal.
    let matrix = &summaries.correlation;
    for i in 0..4 {
        assert!((matrix.values[i][i] - 1.0).abs() < 1e-9);
        for j in 0..4 {
            assert!((matrix.values[i][j] - matrix.values[j][i]).abs() < 1e-12);
        }
    }
}

#[test]
fn rollup_only_snapshot_fails_aggregation() {
    let file = write_csv(&[
        "All India,,2020-01-01,10.0,5.0,1.0,16.0",
        "All India,,2020-02-01,11.0,6.0,1.0,18.0",
    ]);

    let raw = load_records(file.path()).expect("load");
    let (records, _) = clean(raw).expect("clean");

    let err = aggregator::summarize(&records, 5).unwrap_err();
    assert_eq!(err.summary, "region totals");
    assert!(aggregator::state_totals(&records).is_err());
}

#[test]
fn bad_date_aborts_cleaning_with_row_context() {
    let file = write_csv(&[
        "Tamil Nadu,South,2020-01-01,10.0,5.0,1.0,16.0",
        "Gujarat,West,02.31.2020,8.0,6.0,0.0,14.0",
    ]);

    let raw = load_records(file.path()).expect("load");
    let err = clean(raw).unwrap_err();
    assert_eq!(err.row, 3);
    assert_eq!(err.state_name, "Gujarat");
}
