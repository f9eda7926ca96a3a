use crate::error::PipelineError;
use crate::shot_schema::ShotColumns;
use crate::stats_fetch::{cell_f64, StatFrame};

/// Shot-zone attempt shares for one team, derived from season totals.
#[derive(Debug, Clone)]
pub struct ShotRates {
    pub team_id: u64,
    pub rim_rate: f64,
    pub mid_rate: f64,
    pub three_rate: f64,
    /// Set when the team recorded no attempts (0-game queries); the
    /// renderer skips flagged rows rather than chart a fabricated zero.
    pub low_volume: bool,
}

/// Attempt-share rates from Base season totals: (3PAR, FTR, low_volume).
pub fn base_rates(fga: f64, fg3a: f64, fta: f64) -> (f64, f64, bool) {
    if fga <= 0.0 {
        return (0.0, 0.0, true);
    }
    (fg3a / fga, fta / fga, false)
}

/// Derive rim/mid/three attempt shares per row of the flattened
/// shot-location frame. `total_fga` is the row-wise sum over every column
/// whose name contains "FGA", so the three shares need not sum to exactly
/// one (paint non-RA and backcourt attempts share the denominator).
pub fn derive_shot_rates(
    frame: &StatFrame,
    columns: &ShotColumns,
) -> Result<Vec<ShotRates>, PipelineError> {
    let team_id_col = frame
        .column("TEAM_ID")
        .ok_or(PipelineError::MissingColumn {
            frame: "shot locations",
            column: "TEAM_ID",
        })?;

    let mut out = Vec::with_capacity(frame.rows.len());
    for row in &frame.rows {
        let team_id = row
            .get(team_id_col)
            .and_then(cell_f64)
            .map(|id| id as u64)
            .unwrap_or(0);

        let total_fga: f64 = columns
            .all_fga
            .iter()
            .filter_map(|&idx| row.get(idx).and_then(cell_f64))
            .sum();

        if total_fga <= 0.0 {
            out.push(ShotRates {
                team_id,
                rim_rate: 0.0,
                mid_rate: 0.0,
                three_rate: 0.0,
                low_volume: true,
            });
            continue;
        }

        let rim_fga = row.get(columns.rim_fga).and_then(cell_f64).unwrap_or(0.0);
        let mid_fga = row.get(columns.mid_fga).and_then(cell_f64).unwrap_or(0.0);
        let three_fga: f64 = columns
            .three_fga
            .iter()
            .filter_map(|&idx| row.get(idx).and_then(cell_f64))
            .sum();

        out.push(ShotRates {
            team_id,
            rim_rate: rim_fga / total_fga,
            mid_rate: mid_fga / total_fga,
            three_rate: three_fga / total_fga,
            low_volume: false,
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shot_schema::{flatten, locate_shot_columns};
    use crate::stats_fetch::ShotLocationTable;
    use serde_json::{json, Value};

    fn shot_frame(rows: Vec<Vec<Value>>) -> StatFrame {
        let table = ShotLocationTable {
            zones: vec![
                "Restricted Area".to_string(),
                "In The Paint (Non-RA)".to_string(),
                "Mid-Range".to_string(),
                "Left Corner 3".to_string(),
                "Above the Break 3".to_string(),
            ],
            columns_to_skip: 2,
            column_span: 1,
            columns: vec![
                "TEAM_ID".to_string(),
                "TEAM_NAME".to_string(),
                "FGA".to_string(),
                "FGA".to_string(),
                "FGA".to_string(),
                "FGA".to_string(),
                "FGA".to_string(),
            ],
            rows,
        };
        flatten(&table).expect("flatten should succeed")
    }

    #[test]
    fn base_rates_from_totals() {
        let (three_par, ftr, flagged) = base_rates(8000.0, 3200.0, 1600.0);
        assert!((three_par - 0.40).abs() < 1e-12);
        assert!((ftr - 0.20).abs() < 1e-12);
        assert!(!flagged);
    }

    #[test]
    fn zero_attempts_flags_the_row() {
        let (three_par, ftr, flagged) = base_rates(0.0, 0.0, 0.0);
        assert_eq!(three_par, 0.0);
        assert_eq!(ftr, 0.0);
        assert!(flagged);
    }

    #[test]
    fn zone_shares_conserve_attempt_counts() {
        // rim 2600, paint 1500, mid 800, corner 350, above-break 2300.
        let frame = shot_frame(vec![vec![
            json!(1),
            json!("Testers"),
            json!(2600),
            json!(1500),
            json!(800),
            json!(350),
            json!(2300),
        ]]);
        let columns = locate_shot_columns(&frame).expect("columns should resolve");
        let rates = derive_shot_rates(&frame, &columns).expect("rates should derive");
        assert_eq!(rates.len(), 1);

        let total = 2600.0 + 1500.0 + 800.0 + 350.0 + 2300.0;
        let expected = (2600.0 + 800.0 + 350.0 + 2300.0) / total;
        let sum = rates[0].rim_rate + rates[0].mid_rate + rates[0].three_rate;
        assert!((sum - expected).abs() < 1e-6);
        assert!(!rates[0].low_volume);
    }

    #[test]
    fn zero_total_fga_yields_flagged_zero_rates() {
        let frame = shot_frame(vec![vec![
            json!(9),
            json!("Preseason Phantoms"),
            json!(0),
            json!(0),
            json!(0),
            json!(0),
            json!(0),
        ]]);
        let columns = locate_shot_columns(&frame).expect("columns should resolve");
        let rates = derive_shot_rates(&frame, &columns).expect("rates should derive");
        assert_eq!(rates[0].rim_rate, 0.0);
        assert_eq!(rates[0].mid_rate, 0.0);
        assert_eq!(rates[0].three_rate, 0.0);
        assert!(rates[0].low_volume);
        assert_eq!(rates[0].team_id, 9);
    }
}
