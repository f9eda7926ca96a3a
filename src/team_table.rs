use std::collections::HashMap;

use serde_json::Value;

use crate::error::PipelineError;
use crate::stats_fetch::{cell_f64, cell_str, StatFrame};
use crate::team_rates::{base_rates, ShotRates};

/// Canonical per-team row: one per league team for the season, immutable
/// once the join completes.
#[derive(Debug, Clone)]
pub struct TeamRow {
    pub team_id: u64,
    pub team_name: String,
    pub games_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub fga: u32,
    pub fg3a: u32,
    pub fta: u32,
    /// fg3a / fga, box-score provenance; this is the rate on the radar.
    pub three_point_attempt_rate: f64,
    pub free_throw_rate: f64,
    pub off_rating: f64,
    pub def_rating: f64,
    pub net_rating: f64,
    pub pace: f64,
    pub offensive_rebound_pct: f64,
    pub rim_rate: f64,
    pub mid_rate: f64,
    /// Shot-location provenance; kept for zone accounting, not charted.
    pub three_rate: f64,
    pub low_volume: bool,
}

struct BaseRow {
    team_id: u64,
    team_name: String,
    games_played: u32,
    wins: u32,
    losses: u32,
    fga: u32,
    fg3a: u32,
    fta: u32,
}

#[derive(Clone, Copy)]
struct AdvancedRow {
    off_rating: f64,
    def_rating: f64,
    net_rating: f64,
    pace: f64,
    offensive_rebound_pct: f64,
}

/// Two-stage inner join on team id: Base ⨝ Advanced, then ⨝ shot rates.
///
/// The league roster is invariant within a season, so each stage demands a
/// joined row for every team either input carries; any shortfall means a
/// missing team and aborts rather than silently dropping a chart.
pub fn build_rows(
    base: &StatFrame,
    advanced: &StatFrame,
    shot_rates: &[ShotRates],
) -> Result<Vec<TeamRow>, PipelineError> {
    let base_rows = extract_base(base)?;
    let advanced_rows = extract_advanced(advanced)?;

    let expected_advanced = base_rows.len().max(advanced_rows.len());
    let mut merged = Vec::with_capacity(base_rows.len());
    for row in base_rows {
        if let Some(adv) = advanced_rows.get(&row.team_id) {
            merged.push((row, *adv));
        }
    }
    if merged.len() < expected_advanced {
        return Err(PipelineError::JoinIncomplete {
            stage: "advanced",
            expected: expected_advanced,
            joined: merged.len(),
        });
    }

    let shots: HashMap<u64, &ShotRates> =
        shot_rates.iter().map(|rates| (rates.team_id, rates)).collect();
    let expected_shots = merged.len().max(shots.len());
    let mut out = Vec::with_capacity(merged.len());
    for (row, adv) in merged {
        let Some(rates) = shots.get(&row.team_id) else {
            continue;
        };
        let (three_point_attempt_rate, free_throw_rate, base_flag) =
            base_rates(row.fga as f64, row.fg3a as f64, row.fta as f64);
        out.push(TeamRow {
            team_id: row.team_id,
            team_name: row.team_name,
            games_played: row.games_played,
            wins: row.wins,
            losses: row.losses,
            fga: row.fga,
            fg3a: row.fg3a,
            fta: row.fta,
            three_point_attempt_rate,
            free_throw_rate,
            off_rating: adv.off_rating,
            def_rating: adv.def_rating,
            net_rating: adv.net_rating,
            pace: adv.pace,
            offensive_rebound_pct: adv.offensive_rebound_pct,
            rim_rate: rates.rim_rate,
            mid_rate: rates.mid_rate,
            three_rate: rates.three_rate,
            low_volume: base_flag || rates.low_volume,
        });
    }
    if out.len() < expected_shots {
        return Err(PipelineError::JoinIncomplete {
            stage: "shot locations",
            expected: expected_shots,
            joined: out.len(),
        });
    }

    Ok(out)
}

fn extract_base(frame: &StatFrame) -> Result<Vec<BaseRow>, PipelineError> {
    let team_id = require(frame, "base", "TEAM_ID")?;
    let team_name = require(frame, "base", "TEAM_NAME")?;
    let games_played = require(frame, "base", "GP")?;
    let wins = require(frame, "base", "W")?;
    let losses = require(frame, "base", "L")?;
    let fga = require(frame, "base", "FGA")?;
    let fg3a = require(frame, "base", "FG3A")?;
    let fta = require(frame, "base", "FTA")?;

    let mut out = Vec::with_capacity(frame.rows.len());
    for row in &frame.rows {
        out.push(BaseRow {
            team_id: num(row, team_id) as u64,
            team_name: row
                .get(team_name)
                .and_then(cell_str)
                .unwrap_or_default()
                .to_string(),
            games_played: num(row, games_played) as u32,
            wins: num(row, wins) as u32,
            losses: num(row, losses) as u32,
            fga: num(row, fga) as u32,
            fg3a: num(row, fg3a) as u32,
            fta: num(row, fta) as u32,
        });
    }
    Ok(out)
}

fn extract_advanced(frame: &StatFrame) -> Result<HashMap<u64, AdvancedRow>, PipelineError> {
    let team_id = require(frame, "advanced", "TEAM_ID")?;
    let off_rating = require(frame, "advanced", "OFF_RATING")?;
    let def_rating = require(frame, "advanced", "DEF_RATING")?;
    let net_rating = require(frame, "advanced", "NET_RATING")?;
    let pace = require(frame, "advanced", "PACE")?;
    // The service has shipped this column under both names.
    let orb_pct = frame
        .column_any(&["OREB_PCT", "ORB_PCT"])
        .ok_or(PipelineError::MissingColumn {
            frame: "advanced",
            column: "OREB_PCT",
        })?;

    let mut out = HashMap::with_capacity(frame.rows.len());
    for row in &frame.rows {
        out.insert(
            num(row, team_id) as u64,
            AdvancedRow {
                off_rating: num(row, off_rating),
                def_rating: num(row, def_rating),
                net_rating: num(row, net_rating),
                pace: num(row, pace),
                offensive_rebound_pct: num(row, orb_pct),
            },
        );
    }
    Ok(out)
}

fn require(
    frame: &StatFrame,
    frame_name: &'static str,
    column: &'static str,
) -> Result<usize, PipelineError> {
    frame.column(column).ok_or(PipelineError::MissingColumn {
        frame: frame_name,
        column,
    })
}

fn num(row: &[Value], idx: usize) -> f64 {
    row.get(idx).and_then(cell_f64).unwrap_or(0.0)
}
