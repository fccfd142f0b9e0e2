//! Renewscope - regional renewable-energy CSV analysis & chart report generator.

use anyhow::Context;
use clap::Parser;
use renewscope::{data, report, stats};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "renewscope")]
#[command(about = "Analyze a regional renewable-energy CSV snapshot and render report charts")]
#[command(version)]
struct Cli {
    /// Path to the renewable-energy CSV snapshot
    input: PathBuf,

    /// Directory the chart images are written into
    #[arg(long, default_value = "charts")]
    out_dir: PathBuf,

    /// How many top states the growth summary tracks
    #[arg(long, default_value_t = 5)]
    top_states: usize,

    /// Print the report only, skip chart rendering
    #[arg(long)]
    no_charts: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("renewscope=info")),
        )
        .init();

    let cli = Cli::parse();

    let raw = data::load_records(&cli.input).context("loading the dataset")?;
    info!(rows = raw.len(), path = %cli.input.display(), "dataset loaded");

    let missing_before = data::cleaner::missing_value_counts(&raw);
    let duplicate_rows = data::cleaner::duplicate_row_count(&raw);
    let (records, state_region_map) = data::clean(raw).context("cleaning the dataset")?;
    info!(
        rows = records.len(),
        states_mapped = state_region_map.len(),
        "dataset cleaned"
    );

    // The table is frozen from here on; aggregation and reporting only read it.
    let summaries =
        stats::summarize(&records, cli.top_states).context("aggregating the dataset")?;
    let eligible: Vec<_> = records
        .iter()
        .filter(|r| !r.is_national_rollup())
        .cloned()
        .collect();
    let column_stats = stats::describe(&eligible);

    report::print_report(
        &records,
        &missing_before,
        duplicate_rows,
        &column_stats,
        &summaries,
    );

    if !cli.no_charts {
        let written = report::render_all(&summaries, &cli.out_dir).context("rendering charts")?;
        for path in &written {
            info!(chart = %path.display(), "written");
        }
    }

    Ok(())
}
