use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::error::PipelineError;
use crate::http_client::http_client;

const TEAM_STATS_URL: &str = "https://stats.nba.com/stats/leaguedashteamstats";
const SHOT_LOCATIONS_URL: &str = "https://stats.nba.com/stats/leaguedashteamshotlocations";

// Fixed by policy: rates must be derived from season sums to be comparable
// across teams with differing games played.
const SEASON_TYPE: &str = "Regular Season";
const PER_MODE: &str = "Totals";

/// Flat tabular frame: one header per column, loosely-typed cells straight
/// out of the service's `rowSet` arrays.
#[derive(Debug, Clone)]
pub struct StatFrame {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl StatFrame {
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// First match among candidate names. The service has shipped some
    /// columns under more than one name across revisions.
    pub fn column_any(&self, names: &[&str]) -> Option<usize> {
        names.iter().find_map(|name| self.column(name))
    }
}

/// Numeric cell coercion: `rowSet` mixes JSON numbers with numeric strings.
pub fn cell_f64(cell: &Value) -> Option<f64> {
    match cell {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

pub fn cell_str(cell: &Value) -> Option<&str> {
    cell.as_str().map(str::trim)
}

/// Shot-Location response before header flattening: a zone level spanning
/// groups of bottom columns, plus the bottom column names themselves.
#[derive(Debug, Clone)]
pub struct ShotLocationTable {
    pub zones: Vec<String>,
    pub columns_to_skip: usize,
    pub column_span: usize,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct TeamStatsResponse {
    #[serde(rename = "resultSets", default)]
    result_sets: Vec<TeamStatsResultSet>,
}

#[derive(Debug, Deserialize)]
struct TeamStatsResultSet {
    headers: Vec<String>,
    #[serde(rename = "rowSet")]
    row_set: Vec<Vec<Value>>,
}

// The shot-location endpoint nests `resultSets` as a single object whose
// headers carry two levels instead of the usual flat string list.
#[derive(Debug, Deserialize)]
struct ShotLocationsResponse {
    #[serde(rename = "resultSets")]
    result_sets: ShotLocationsResultSet,
}

#[derive(Debug, Deserialize)]
struct ShotLocationsResultSet {
    headers: Vec<ShotHeaderLevel>,
    #[serde(rename = "rowSet")]
    row_set: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct ShotHeaderLevel {
    name: String,
    #[serde(rename = "columnsToSkip", default)]
    columns_to_skip: usize,
    #[serde(rename = "columnSpan", default = "default_column_span")]
    column_span: usize,
    #[serde(rename = "columnNames", default)]
    column_names: Vec<String>,
}

fn default_column_span() -> usize {
    1
}

pub fn parse_team_stats_json(raw: &str) -> Result<StatFrame> {
    let response: TeamStatsResponse =
        serde_json::from_str(raw.trim()).context("invalid team stats json")?;
    let Some(set) = response.result_sets.into_iter().next() else {
        bail!("team stats response carries no result set");
    };
    Ok(StatFrame {
        headers: set.headers,
        rows: set.row_set,
    })
}

pub fn parse_shot_locations_json(raw: &str) -> Result<ShotLocationTable> {
    let response: ShotLocationsResponse =
        serde_json::from_str(raw.trim()).context("invalid shot locations json")?;
    let set = response.result_sets;

    let zone_level = set
        .headers
        .iter()
        .find(|level| level.name == "SHOT_CATEGORY")
        .context("shot locations response has no SHOT_CATEGORY header level")?;
    let column_level = set
        .headers
        .iter()
        .find(|level| level.name == "columns")
        .context("shot locations response has no columns header level")?;

    Ok(ShotLocationTable {
        zones: zone_level.column_names.clone(),
        columns_to_skip: zone_level.columns_to_skip,
        column_span: zone_level.column_span,
        columns: column_level.column_names.clone(),
        rows: set.row_set,
    })
}

pub fn fetch_base(season: &str) -> Result<StatFrame, PipelineError> {
    let body = get_body(
        "leaguedashteamstats (Base)",
        TEAM_STATS_URL,
        &team_stats_params(season, "Base"),
        season,
    )?;
    parse_team_stats_json(&body)
        .map_err(|err| upstream("leaguedashteamstats (Base)", season, &err))
}

pub fn fetch_advanced(season: &str) -> Result<StatFrame, PipelineError> {
    let body = get_body(
        "leaguedashteamstats (Advanced)",
        TEAM_STATS_URL,
        &team_stats_params(season, "Advanced"),
        season,
    )?;
    parse_team_stats_json(&body)
        .map_err(|err| upstream("leaguedashteamstats (Advanced)", season, &err))
}

pub fn fetch_shot_locations(season: &str) -> Result<ShotLocationTable, PipelineError> {
    let body = get_body(
        "leaguedashteamshotlocations",
        SHOT_LOCATIONS_URL,
        &shot_locations_params(season),
        season,
    )?;
    parse_shot_locations_json(&body)
        .map_err(|err| upstream("leaguedashteamshotlocations", season, &err))
}

// The service 400s on sparse queries, so both endpoints send the full
// parameter set its own frontend uses, mostly empty.
fn team_stats_params<'a>(season: &'a str, measure_type: &'a str) -> Vec<(&'static str, &'a str)> {
    vec![
        ("Conference", ""),
        ("DateFrom", ""),
        ("DateTo", ""),
        ("Division", ""),
        ("GameScope", ""),
        ("GameSegment", ""),
        ("LastNGames", "0"),
        ("LeagueID", "00"),
        ("Location", ""),
        ("MeasureType", measure_type),
        ("Month", "0"),
        ("OpponentTeamID", "0"),
        ("Outcome", ""),
        ("PORound", "0"),
        ("PaceAdjust", "N"),
        ("PerMode", PER_MODE),
        ("Period", "0"),
        ("PlayerExperience", ""),
        ("PlayerPosition", ""),
        ("PlusMinus", "N"),
        ("Rank", "N"),
        ("Season", season),
        ("SeasonSegment", ""),
        ("SeasonType", SEASON_TYPE),
        ("ShotClockRange", ""),
        ("StarterBench", ""),
        ("TeamID", "0"),
        ("TwoWay", "0"),
        ("VsConference", ""),
        ("VsDivision", ""),
    ]
}

fn shot_locations_params(season: &str) -> Vec<(&'static str, &str)> {
    vec![
        ("Conference", ""),
        ("DateFrom", ""),
        ("DateTo", ""),
        ("DistanceRange", "By Zone"),
        ("Division", ""),
        ("GameScope", ""),
        ("GameSegment", ""),
        ("LastNGames", "0"),
        ("LeagueID", "00"),
        ("Location", ""),
        ("MeasureType", "Base"),
        ("Month", "0"),
        ("OpponentTeamID", "0"),
        ("Outcome", ""),
        ("PORound", "0"),
        ("PaceAdjust", "N"),
        ("PerMode", PER_MODE),
        ("Period", "0"),
        ("PlayerExperience", ""),
        ("PlayerPosition", ""),
        ("PlusMinus", "N"),
        ("Rank", "N"),
        ("Season", season),
        ("SeasonSegment", ""),
        ("SeasonType", SEASON_TYPE),
        ("ShotClockRange", ""),
        ("StarterBench", ""),
        ("TeamID", "0"),
        ("VsConference", ""),
        ("VsDivision", ""),
    ]
}

fn get_body(
    endpoint: &'static str,
    url: &str,
    params: &[(&'static str, &str)],
    season: &str,
) -> Result<String, PipelineError> {
    let client = http_client().map_err(|err| upstream(endpoint, season, &err))?;
    client
        .get(url)
        .query(params)
        .send()
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.text())
        .map_err(|err| PipelineError::UpstreamUnavailable {
            endpoint,
            season: season.to_string(),
            message: err.to_string(),
        })
}

fn upstream(endpoint: &'static str, season: &str, err: &anyhow::Error) -> PipelineError {
    PipelineError::UpstreamUnavailable {
        endpoint,
        season: season.to_string(),
        message: format!("{err:#}"),
    }
}
