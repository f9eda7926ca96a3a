use std::f64::consts::{FRAC_PI_2, TAU};
use std::path::{Path, PathBuf};

use anyhow::Result;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::normalize::{RadarRow, DEGENERATE_NORM, RADAR_METRICS};
use crate::team_colors::team_color_hex;

const CHART_SIZE: u32 = 900;
const GRID_RINGS: [f64; 5] = [2.0, 4.0, 6.0, 8.0, 10.0];
const AXIS_MAX: f64 = 10.0;
const LABEL_RADIUS: f64 = 11.6;
const PLOT_RANGE: f64 = 13.0;

/// Team display name with filesystem-hostile characters replaced, plus the
/// image extension. Re-runs overwrite the same path by design.
pub fn sanitize_chart_filename(team_name: &str) -> String {
    let mut name = team_name.replace(' ', "_").replace('/', "_");
    name.push_str(".png");
    name
}

/// Render one team's radar into `dir`, returning the chart path.
pub fn render_team_chart(dir: &Path, row: &RadarRow, season: &str) -> Result<PathBuf> {
    let path = dir.join(sanitize_chart_filename(&row.team.team_name));
    let color = parse_hex_color(team_color_hex(&row.team.team_name));

    let backend_path = path.clone();
    let root = BitMapBackend::new(&backend_path, (CHART_SIZE, CHART_SIZE)).into_drawing_area();
    root.fill(&WHITE)?;

    let title = format!("{} \u{2022} {} Style of Play", row.team.team_name, season);
    let subtitle = format!(
        "ORTG {:.1} \u{2022} DRTG {:.1} \u{2022} Net {:+.1} \u{2022} {}-{}",
        row.team.off_rating,
        row.team.def_rating,
        row.team.net_rating,
        row.team.wins,
        row.team.losses
    );
    let centered_top = Pos::new(HPos::Center, VPos::Top);
    let title_style = TextStyle::from(("sans-serif", 34).into_font())
        .color(&color)
        .pos(centered_top);
    let subtitle_style = TextStyle::from(("sans-serif", 22).into_font())
        .color(&RGBColor(90, 90, 90))
        .pos(centered_top);
    root.draw_text(&title, &title_style, (CHART_SIZE as i32 / 2, 22))?;
    root.draw_text(&subtitle, &subtitle_style, (CHART_SIZE as i32 / 2, 64))?;

    let mut chart = ChartBuilder::on(&root)
        .margin_top(100)
        .margin_bottom(20)
        .margin_left(60)
        .margin_right(60)
        .build_cartesian_2d(-PLOT_RANGE..PLOT_RANGE, -PLOT_RANGE..PLOT_RANGE)?;

    let grid = RGBColor(150, 150, 150).mix(0.6);
    for ring in GRID_RINGS {
        chart.draw_series(DashedLineSeries::new(closed_ring(ring), 6, 4, grid.into()))?;
    }
    for axis in 0..RADAR_METRICS.len() {
        chart.draw_series(LineSeries::new(
            vec![(0.0, 0.0), axis_point(AXIS_MAX, axis)],
            grid,
        ))?;
    }

    // League average reference ring.
    let average = RGBColor(128, 128, 128).mix(0.8).stroke_width(2);
    chart.draw_series(DashedLineSeries::new(
        closed_ring(DEGENERATE_NORM),
        10,
        6,
        average,
    ))?;

    let shape: Vec<(f64, f64)> = row
        .norms
        .iter()
        .enumerate()
        .map(|(axis, &norm)| axis_point(norm, axis))
        .collect();
    chart.draw_series(std::iter::once(Polygon::new(shape.clone(), color.mix(0.25).filled())))?;
    let mut outline = shape;
    outline.push(outline[0]);
    chart.draw_series(LineSeries::new(outline, color.stroke_width(3)))?;

    let label_style = TextStyle::from(("sans-serif", 22).into_font())
        .color(&RGBColor(40, 40, 40))
        .pos(Pos::new(HPos::Center, VPos::Center));
    chart.draw_series(RADAR_METRICS.iter().enumerate().map(|(axis, metric)| {
        Text::new(
            metric.label().to_string(),
            axis_point(LABEL_RADIUS, axis),
            label_style.clone(),
        )
    }))?;

    root.present()?;
    Ok(path)
}

/// Axis 0 points straight up; subsequent axes proceed clockwise.
fn axis_point(radius: f64, axis: usize) -> (f64, f64) {
    let theta = FRAC_PI_2 - axis as f64 * TAU / RADAR_METRICS.len() as f64;
    (radius * theta.cos(), radius * theta.sin())
}

fn closed_ring(radius: f64) -> Vec<(f64, f64)> {
    (0..=RADAR_METRICS.len())
        .map(|axis| axis_point(radius, axis % RADAR_METRICS.len()))
        .collect()
}

fn parse_hex_color(hex: &str) -> RGBColor {
    let raw = hex.trim().trim_start_matches('#');
    if raw.len() == 6 {
        if let (Ok(r), Ok(g), Ok(b)) = (
            u8::from_str_radix(&raw[0..2], 16),
            u8::from_str_radix(&raw[2..4], 16),
            u8::from_str_radix(&raw[4..6], 16),
        ) {
            return RGBColor(r, g, b);
        }
    }
    RGBColor(0x33, 0x33, 0x33)
}
