use std::env;
use std::fs;
use std::path::Path;
use std::process;

use anyhow::{Context, Result};

use hoop_radar::season::{validate_season_label, DEFAULT_SEASON};
use hoop_radar::{normalize, radar_chart, shot_schema, stats_fetch, team_rates, team_table};

const OUTPUT_DIR: &str = "radar_charts";

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let season = env::args()
        .nth(1)
        .or_else(|| env::var("RADAR_SEASON").ok())
        .unwrap_or_else(|| DEFAULT_SEASON.to_string());
    validate_season_label(&season)?;

    println!("Fetching league team stats for {season}...");
    let base = stats_fetch::fetch_base(&season)?;
    let advanced = stats_fetch::fetch_advanced(&season)?;
    let shot_table = stats_fetch::fetch_shot_locations(&season)?;

    let shot_frame = shot_schema::flatten(&shot_table)
        .context("flattening shot location headers")?;
    let shot_columns = shot_schema::locate_shot_columns(&shot_frame)?;
    let shot_rates = team_rates::derive_shot_rates(&shot_frame, &shot_columns)?;

    let rows = team_table::build_rows(&base, &advanced, &shot_rates)?;
    let league = normalize::normalize_league(rows);

    let out_dir = Path::new(OUTPUT_DIR);
    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {OUTPUT_DIR}/"))?;

    println!("Generating radar charts...");
    let mut rendered = 0usize;
    let mut skipped = 0usize;
    for row in &league {
        if row.team.low_volume {
            eprintln!(
                "[WARN] skipping {}: no recorded field-goal attempts",
                row.team.team_name
            );
            skipped += 1;
            continue;
        }
        match radar_chart::render_team_chart(out_dir, row, &season) {
            Ok(_) => rendered += 1,
            Err(err) => {
                // One bad render must not suppress the other charts.
                eprintln!("[WARN] chart failed for {}: {err:#}", row.team.team_name);
                skipped += 1;
            }
        }
    }

    println!("Done. {rendered} charts written to {OUTPUT_DIR}/ ({skipped} skipped).");
    Ok(())
}
