//! Statistics Calculator Module
//! Descriptive statistics and Pearson correlation over energy columns.

use crate::data::CleanRecord;
use statrs::statistics::Statistics;

/// The four numeric columns every multi-column summary covers, in report
/// order.
pub const ENERGY_COLUMNS: [&str; 4] = [
    "wind_energy",
    "solar_energy",
    "other_renewable_energy",
    "total_renewable_energy",
];

/// Extract one energy column as a plain vector, in `ENERGY_COLUMNS` order.
pub fn column_values(records: &[CleanRecord], column_index: usize) -> Vec<f64> {
    records
        .iter()
        .map(|r| match column_index {
            0 => r.wind_energy,
            1 => r.solar_energy,
            2 => r.other_renewable_energy,
            _ => r.total_renewable_energy,
        })
        .collect()
}

/// Descriptive statistics for a single energy column.
#[derive(Debug, Clone)]
pub struct ColumnStats {
    pub column: &'static str,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub median: f64,
    pub max: f64,
}

/// Compute the describe-style block for all four energy columns.
pub fn describe(records: &[CleanRecord]) -> Vec<ColumnStats> {
    ENERGY_COLUMNS
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let values = column_values(records, i);
            column_stats(column, &values)
        })
        .collect()
}

fn column_stats(column: &'static str, values: &[f64]) -> ColumnStats {
    let n = values.len();
    if n == 0 {
        return ColumnStats {
            column,
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            median: f64::NAN,
            max: f64::NAN,
        };
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };

    ColumnStats {
        column,
        count: n,
        mean: values.mean(),
        std: if n > 1 { values.std_dev() } else { 0.0 },
        min: Statistics::min(values),
        median,
        max: Statistics::max(values),
    }
}

/// Pairwise Pearson correlation coefficient.
///
/// Returns NaN when either column has zero variance, matching what a
/// dataframe correlation would report for a constant column.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n == 0 {
        return f64::NAN;
    }

    let mean_x = x[..n].mean();
    let mean_y = y[..n].mean();

    let mut covariance = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for i in 0..n {
        let dx = x[i] - mean_x;
        let dy = y[i] - mean_y;
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denominator = (var_x * var_y).sqrt();
    if denominator == 0.0 {
        f64::NAN
    } else {
        covariance / denominator
    }
}
