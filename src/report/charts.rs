//! Static chart rendering with plotters.
//!
//! Consumes only the precomputed summary tables; nothing here reaches back
//! into the raw or cleaned records. Presentation-only choices (sort order of
//! bars, colors, figure sizes, file names) live in this module.

use crate::stats::aggregator::{
    MonthlyAverage, RegionDistribution, RegionTotals, StateAverage, StateTotal, Summaries,
    TopStatesGrowth, YearTotals,
};
use plotters::data::Quartiles;
use plotters::element::{Boxplot, Pie};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error as ThisError;
use tracing::info;

const WIND_COLOR: RGBColor = RGBColor(86, 156, 214);
const SOLAR_COLOR: RGBColor = RGBColor(237, 160, 49);
const OTHER_COLOR: RGBColor = RGBColor(96, 173, 96);
const TOTAL_COLOR: RGBColor = RGBColor(40, 40, 40);

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(ThisError, Debug)]
pub enum ReportError {
    #[error("failed to create output directory '{path}': {source}")]
    OutputDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to render the {chart} chart: {message}")]
    Render { chart: &'static str, message: String },
}

fn rendered(
    chart: &'static str,
    result: Result<(), Box<dyn Error>>,
) -> Result<(), ReportError> {
    result.map_err(|e| ReportError::Render {
        chart,
        message: e.to_string(),
    })
}

/// Render every chart into `out_dir`, returning the written paths.
///
/// Charts are independent; a failure in one aborts the pass but leaves
/// already-written images intact.
pub fn render_all(summaries: &Summaries, out_dir: &Path) -> Result<Vec<PathBuf>, ReportError> {
    fs::create_dir_all(out_dir).map_err(|source| ReportError::OutputDir {
        path: out_dir.display().to_string(),
        source,
    })?;

    let mut written = Vec::new();
    let mut emit = |name: &'static str,
                    chart: &'static str,
                    result: Result<(), Box<dyn Error>>|
     -> Result<(), ReportError> {
        rendered(chart, result)?;
        written.push(out_dir.join(name));
        Ok(())
    };

    emit(
        "region_totals.png",
        "region totals",
        region_totals_chart(&out_dir.join("region_totals.png"), &summaries.region_totals),
    )?;
    emit(
        "yearly_trends.png",
        "yearly trends",
        yearly_trends_chart(&out_dir.join("yearly_trends.png"), &summaries.yearly_trends),
    )?;
    emit(
        "energy_mix.png",
        "energy mix",
        energy_mix_chart(&out_dir.join("energy_mix.png"), &summaries.region_totals),
    )?;
    emit(
        "region_mix.png",
        "region mix",
        region_mix_chart(&out_dir.join("region_mix.png"), &summaries.region_totals),
    )?;
    emit(
        "top_states.png",
        "top states",
        top_states_chart(&out_dir.join("top_states.png"), &summaries.state_totals),
    )?;
    emit(
        "state_averages.png",
        "state averages",
        state_averages_chart(&out_dir.join("state_averages.png"), &summaries.state_averages),
    )?;
    emit(
        "monthly_averages.png",
        "monthly averages",
        monthly_averages_chart(
            &out_dir.join("monthly_averages.png"),
            &summaries.monthly_averages,
        ),
    )?;
    emit(
        "top_states_growth.png",
        "top states growth",
        top_states_growth_chart(
            &out_dir.join("top_states_growth.png"),
            &summaries.top_states_growth,
        ),
    )?;
    emit(
        "regional_disparities.png",
        "regional disparities",
        regional_disparities_chart(
            &out_dir.join("regional_disparities.png"),
            &summaries.region_distributions,
        ),
    )?;
    emit(
        "correlation.png",
        "correlation heatmap",
        correlation_chart(&out_dir.join("correlation.png"), summaries),
    )?;

    info!(charts = written.len(), dir = %out_dir.display(), "charts rendered");
    Ok(written)
}

fn bar_chart(
    path: &Path,
    size: (u32, u32),
    title: &str,
    x_desc: &str,
    y_desc: &str,
    labels: &[String],
    values: &[f64],
    color: RGBColor,
) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let y_max = values.iter().copied().fold(0.0f64, f64::max).max(1.0) * 1.1;
    let labels = labels.to_vec();

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d((0..labels.len()).into_segmented(), 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len())
        .x_label_formatter(&|x| match x {
            SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
            _ => String::new(),
        })
        .x_desc(x_desc)
        .y_desc(y_desc)
        .draw()?;

    chart.draw_series(values.iter().enumerate().map(|(i, &v)| {
        let mut bar = Rectangle::new(
            [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), v)],
            color.filled(),
        );
        bar.set_margin(0, 0, 4, 4);
        bar
    }))?;

    root.present()?;
    Ok(())
}

fn region_totals_chart(path: &Path, totals: &[RegionTotals]) -> Result<(), Box<dyn Error>> {
    let mut sorted: Vec<&RegionTotals> = totals.iter().collect();
    sorted.sort_by(|a, b| {
        b.energy
            .total
            .partial_cmp(&a.energy.total)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let labels: Vec<String> = sorted.iter().map(|r| r.region.clone()).collect();
    let values: Vec<f64> = sorted.iter().map(|r| r.energy.total).collect();
    bar_chart(
        path,
        (800, 500),
        "Total Renewable Energy by Region",
        "Region",
        "Total Energy (Units)",
        &labels,
        &values,
        WIND_COLOR,
    )
}

fn top_states_chart(path: &Path, totals: &[StateTotal]) -> Result<(), Box<dyn Error>> {
    let top: Vec<&StateTotal> = totals.iter().take(10).collect();
    let labels: Vec<String> = top.iter().map(|s| s.state_name.clone()).collect();
    let values: Vec<f64> = top.iter().map(|s| s.total).collect();
    bar_chart(
        path,
        (1200, 600),
        "Top 10 States by Total Renewable Energy",
        "State",
        "Total Energy (Units)",
        &labels,
        &values,
        SOLAR_COLOR,
    )
}

fn monthly_averages_chart(path: &Path, averages: &[MonthlyAverage]) -> Result<(), Box<dyn Error>> {
    let labels: Vec<String> = averages
        .iter()
        .map(|m| {
            MONTH_NAMES
                .get(m.month as usize - 1)
                .copied()
                .unwrap_or("?")
                .to_string()
        })
        .collect();
    let values: Vec<f64> = averages.iter().map(|m| m.mean_total).collect();
    bar_chart(
        path,
        (1000, 500),
        "Average Renewable Energy by Month",
        "Month",
        "Average Energy (Units)",
        &labels,
        &values,
        OTHER_COLOR,
    )
}

fn state_averages_chart(path: &Path, averages: &[StateAverage]) -> Result<(), Box<dyn Error>> {
    let top: Vec<&StateAverage> = averages.iter().take(10).collect();
    let labels: Vec<String> = top.iter().map(|s| s.state_name.clone()).collect();
    let values: Vec<f64> = top.iter().map(|s| s.mean_total).collect();
    bar_chart(
        path,
        (1200, 600),
        "Average Renewable Energy by State (Top 10)",
        "State",
        "Average Energy (Units)",
        &labels,
        &values,
        WIND_COLOR,
    )
}

fn regional_disparities_chart(
    path: &Path,
    distributions: &[RegionDistribution],
) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, (900, 550)).into_drawing_area();
    root.fill(&WHITE)?;

    let y_max = distributions
        .iter()
        .flat_map(|d| d.totals.iter().copied())
        .fold(0.0f64, f64::max)
        .max(1.0) as f32
        * 1.1;
    let labels: Vec<String> = distributions.iter().map(|d| d.region.clone()).collect();

    let mut chart = ChartBuilder::on(&root)
        .caption("Regional Disparities in Renewable Energy", ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d((0..labels.len()).into_segmented(), 0f32..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len())
        .x_label_formatter(&|x| match x {
            SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
            _ => String::new(),
        })
        .x_desc("Region")
        .y_desc("Total Energy (Units)")
        .draw()?;

    let boxes: Vec<Quartiles> = distributions
        .iter()
        .map(|d| Quartiles::new(&d.totals))
        .collect();
    chart.draw_series(boxes.iter().enumerate().map(|(i, quartiles)| {
        Boxplot::new_vertical(SegmentValue::CenterOf(i), quartiles)
            .width(40)
            .whisker_width(0.5)
            .style(WIND_COLOR)
    }))?;

    root.present()?;
    Ok(())
}

fn yearly_trends_chart(path: &Path, trends: &[YearTotals]) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let first_year = trends.first().map(|t| t.year).unwrap_or(0);
    let last_year = trends.last().map(|t| t.year).unwrap_or(first_year);
    let x_max = if last_year > first_year {
        last_year
    } else {
        first_year + 1
    };
    let y_max = trends
        .iter()
        .map(|t| t.energy.total)
        .fold(0.0f64, f64::max)
        .max(1.0)
        * 1.1;

    let mut chart = ChartBuilder::on(&root)
        .caption("Renewable Energy Trends by Year", ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(first_year..x_max, 0f64..y_max)?;

    chart
        .configure_mesh()
        .x_labels(trends.len().max(2))
        .x_label_formatter(&|year| format!("{year}"))
        .x_desc("Year")
        .y_desc("Energy Production (Units)")
        .draw()?;

    let series: [(&str, RGBColor, fn(&YearTotals) -> f64); 4] = [
        ("Wind", WIND_COLOR, |t| t.energy.wind),
        ("Solar", SOLAR_COLOR, |t| t.energy.solar),
        ("Other", OTHER_COLOR, |t| t.energy.other),
        ("Total", TOTAL_COLOR, |t| t.energy.total),
    ];

    for (name, color, value) in series {
        let points: Vec<(i32, f64)> = trends.iter().map(|t| (t.year, value(t))).collect();
        chart
            .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))?
            .label(name)
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 18, y)], color.stroke_width(2))
            });
        chart.draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 4, color.filled())),
        )?;
    }

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.85))
        .draw()?;

    root.present()?;
    Ok(())
}

fn energy_mix_chart(path: &Path, totals: &[RegionTotals]) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, (640, 640)).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled("Overall Renewable Energy Mix", ("sans-serif", 24))?;

    let wind: f64 = totals.iter().map(|r| r.energy.wind).sum();
    let solar: f64 = totals.iter().map(|r| r.energy.solar).sum();
    let other: f64 = totals.iter().map(|r| r.energy.other).sum();

    let sizes = vec![wind, solar, other];
    let colors = vec![WIND_COLOR, SOLAR_COLOR, OTHER_COLOR];
    let labels = vec!["Wind".to_string(), "Solar".to_string(), "Other".to_string()];

    let center = (320, 310);
    let radius = 200.0;
    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.label_style(("sans-serif", 18).into_font());
    pie.percentages(("sans-serif", 14).into_font());
    root.draw(&pie)?;

    root.present()?;
    Ok(())
}

fn region_mix_chart(path: &Path, totals: &[RegionTotals]) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, (900, 550)).into_drawing_area();
    root.fill(&WHITE)?;

    let y_max = totals
        .iter()
        .map(|r| r.energy.wind + r.energy.solar + r.energy.other)
        .fold(0.0f64, f64::max)
        .max(1.0)
        * 1.1;
    let labels: Vec<String> = totals.iter().map(|r| r.region.clone()).collect();

    let mut chart = ChartBuilder::on(&root)
        .caption("Renewable Energy Mix by Region", ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d((0..labels.len()).into_segmented(), 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len())
        .x_label_formatter(&|x| match x {
            SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
            _ => String::new(),
        })
        .x_desc("Region")
        .y_desc("Energy Production (Units)")
        .draw()?;

    let layers: [(&str, RGBColor, fn(&RegionTotals) -> f64); 3] = [
        ("Wind", WIND_COLOR, |r| r.energy.wind),
        ("Solar", SOLAR_COLOR, |r| r.energy.solar),
        ("Other", OTHER_COLOR, |r| r.energy.other),
    ];

    for (layer_index, (name, color, value)) in layers.iter().enumerate() {
        let color = *color;
        chart
            .draw_series(totals.iter().enumerate().map(|(i, region)| {
                // Stack this component on top of the ones below it.
                let base: f64 = layers[..layer_index].iter().map(|(_, _, v)| v(region)).sum();
                let top = base + value(region);
                let mut bar = Rectangle::new(
                    [
                        (SegmentValue::Exact(i), base),
                        (SegmentValue::Exact(i + 1), top),
                    ],
                    color.filled(),
                );
                bar.set_margin(0, 0, 6, 6);
                bar
            }))?
            .label(*name)
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - 6), (x + 12, y + 6)], color.filled())
            });
    }

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.85))
        .draw()?;

    root.present()?;
    Ok(())
}

fn top_states_growth_chart(path: &Path, growth: &TopStatesGrowth) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, (1100, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let first_year = growth.years.first().copied().unwrap_or(0);
    let last_year = growth.years.last().copied().unwrap_or(first_year);
    let x_max = if last_year > first_year {
        last_year
    } else {
        first_year + 1
    };
    let y_max = growth
        .series
        .iter()
        .flat_map(|s| s.total_by_year.values().copied())
        .fold(0.0f64, f64::max)
        .max(1.0)
        * 1.1;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Growth of Top {} States", growth.series.len()),
            ("sans-serif", 24),
        )
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(first_year..x_max, 0f64..y_max)?;

    chart
        .configure_mesh()
        .x_labels(growth.years.len().max(2))
        .x_label_formatter(&|year| format!("{year}"))
        .x_desc("Year")
        .y_desc("Total Energy (Units)")
        .draw()?;

    for (i, series) in growth.series.iter().enumerate() {
        let color = Palette99::pick(i).to_rgba();
        let points: Vec<(i32, f64)> = series
            .total_by_year
            .iter()
            .map(|(&year, &total)| (year, total))
            .collect();
        chart
            .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))?
            .label(series.state_name.clone())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 18, y)], color.stroke_width(2))
            });
        chart.draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 4, color.filled())),
        )?;
    }

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.85))
        .draw()?;

    root.present()?;
    Ok(())
}

/// Map a correlation in [-1, 1] onto a blue-white-red ramp.
fn correlation_color(value: f64) -> RGBColor {
    if value.is_nan() {
        return RGBColor(210, 210, 210);
    }
    let t = ((value + 1.0) / 2.0).clamp(0.0, 1.0);
    let lerp = |a: f64, b: f64, t: f64| (a + (b - a) * t) as u8;
    if t < 0.5 {
        let u = t * 2.0;
        RGBColor(lerp(59.0, 255.0, u), lerp(76.0, 255.0, u), lerp(192.0, 255.0, u))
    } else {
        let u = (t - 0.5) * 2.0;
        RGBColor(lerp(255.0, 180.0, u), lerp(255.0, 4.0, u), lerp(255.0, 38.0, u))
    }
}

fn correlation_chart(path: &Path, summaries: &Summaries) -> Result<(), Box<dyn Error>> {
    let matrix = &summaries.correlation;
    let n = matrix.labels.len();
    let short_labels = ["Wind", "Solar", "Other", "Total"];

    let root = BitMapBackend::new(path, (700, 700)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Correlation Between Energy Types", ("sans-serif", 24))
        .margin(15)
        .build_cartesian_2d(-1.2f64..n as f64, -1.0f64..n as f64)?;

    // No mesh or axes; the matrix draws its own cell borders and labels.

    // Cells, row 0 drawn at the top.
    chart.draw_series((0..n).flat_map(|i| {
        (0..n).map(move |j| {
            let value = matrix.values[i][j];
            let y = (n - 1 - i) as f64;
            Rectangle::new(
                [(j as f64, y), (j as f64 + 1.0, y + 1.0)],
                correlation_color(value).filled(),
            )
        })
    }))?;
    chart.draw_series((0..n).flat_map(|i| {
        (0..n).map(move |j| {
            Rectangle::new(
                [
                    (j as f64, (n - 1 - i) as f64),
                    (j as f64 + 1.0, (n - i) as f64),
                ],
                BLACK.stroke_width(1),
            )
        })
    }))?;

    // Cell annotations.
    let cell_style = ("sans-serif", 18)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));
    chart.draw_series((0..n).flat_map(|i| {
        let cell_style = cell_style.clone();
        (0..n).map(move |j| {
            let value = matrix.values[i][j];
            let text = if value.is_nan() {
                "-".to_string()
            } else {
                format!("{value:.2}")
            };
            Text::new(
                text,
                (j as f64 + 0.5, (n - 1 - i) as f64 + 0.5),
                cell_style.clone(),
            )
        })
    }))?;

    // Row and column labels along the left and bottom edges.
    let label_style = ("sans-serif", 18)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));
    chart.draw_series(short_labels.iter().enumerate().map(|(i, label)| {
        Text::new(
            label.to_string(),
            (-0.6, (n - 1 - i) as f64 + 0.5),
            label_style.clone(),
        )
    }))?;
    chart.draw_series(short_labels.iter().enumerate().map(|(j, label)| {
        Text::new(label.to_string(), (j as f64 + 0.5, -0.5), label_style.clone())
    }))?;

    root.present()?;
    Ok(())
}
