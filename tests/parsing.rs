use std::fs;
use std::path::PathBuf;

use hoop_radar::shot_schema::{flatten, locate_shot_columns};
use hoop_radar::stats_fetch::{cell_f64, parse_shot_locations_json, parse_team_stats_json};
use hoop_radar::team_rates::derive_shot_rates;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_base_stats_fixture() {
    let raw = read_fixture("base_stats.json");
    let frame = parse_team_stats_json(&raw).expect("fixture should parse");
    assert_eq!(frame.rows.len(), 2);

    let team_name = frame.column("TEAM_NAME").expect("TEAM_NAME column");
    assert_eq!(frame.rows[0][team_name], "Atlanta Hawks");

    let fg3a = frame.column("FG3A").expect("FG3A column");
    assert_eq!(cell_f64(&frame.rows[1][fg3a]), Some(3950.0));
}

#[test]
fn parses_advanced_stats_fixture() {
    let raw = read_fixture("advanced_stats.json");
    let frame = parse_team_stats_json(&raw).expect("fixture should parse");
    assert_eq!(frame.rows.len(), 2);

    let orb = frame
        .column_any(&["OREB_PCT", "ORB_PCT"])
        .expect("offensive rebound pct column");
    assert_eq!(cell_f64(&frame.rows[0][orb]), Some(0.269));

    let pace = frame.column("PACE").expect("PACE column");
    assert_eq!(cell_f64(&frame.rows[1][pace]), Some(97.4));
}

#[test]
fn parses_and_flattens_shot_locations_fixture() {
    let raw = read_fixture("shot_locations.json");
    let table = parse_shot_locations_json(&raw).expect("fixture should parse");
    assert_eq!(table.zones.len(), 7);
    assert_eq!(table.columns_to_skip, 2);
    assert_eq!(table.column_span, 3);

    let frame = flatten(&table).expect("headers should flatten");
    assert_eq!(frame.headers.len(), 23);
    assert!(frame.headers.iter().any(|h| h == "Restricted Area FGA"));
    assert!(frame.headers.iter().any(|h| h == "Above the Break 3 FGA"));
}

#[test]
fn shot_location_rates_conserve_attempts() {
    let raw = read_fixture("shot_locations.json");
    let table = parse_shot_locations_json(&raw).expect("fixture should parse");
    let frame = flatten(&table).expect("headers should flatten");
    let columns = locate_shot_columns(&frame).expect("columns should resolve");
    assert_eq!(columns.three_fga.len(), 3);
    assert_eq!(columns.all_fga.len(), 7);

    let rates = derive_shot_rates(&frame, &columns).expect("rates should derive");
    assert_eq!(rates.len(), 2);

    // Hawks: rim 2550, mid 790, threes 420+410+2170, total 7885.
    let hawks = &rates[0];
    assert_eq!(hawks.team_id, 1610612737);
    let total = 7885.0;
    assert!((hawks.rim_rate - 2550.0 / total).abs() < 1e-9);
    assert!((hawks.mid_rate - 790.0 / total).abs() < 1e-9);
    assert!((hawks.three_rate - 3000.0 / total).abs() < 1e-9);

    let sum = hawks.rim_rate + hawks.mid_rate + hawks.three_rate;
    let accounted = (2550.0 + 790.0 + 3000.0) / total;
    assert!((sum - accounted).abs() < 1e-6);
}
