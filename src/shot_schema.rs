use anyhow::{bail, Result};

use crate::error::PipelineError;
use crate::stats_fetch::{ShotLocationTable, StatFrame};

/// Resolved column positions in the flattened shot-location frame.
///
/// Lookup is substring-based on purpose: the upstream service has renamed
/// these columns across minor revisions, and positional indexing fails
/// silently when it does.
#[derive(Debug, Clone)]
pub struct ShotColumns {
    pub rim_fga: usize,
    pub mid_fga: usize,
    /// Every column counting three-point attempts (above-the-break and the
    /// corners arrive separately); summed by the rate deriver.
    pub three_fga: Vec<usize>,
    /// Every attempt column, the `total_fga` denominator set.
    pub all_fga: Vec<usize>,
}

/// Collapse the two-level shot-location headers into flat names.
///
/// The first `columns_to_skip` bottom names (team id, team name) pass
/// through bare; after that, zone *i* owns the next `column_span` bottom
/// names, each flattened to `"{zone} {field}"`.
pub fn flatten(table: &ShotLocationTable) -> Result<StatFrame> {
    let expected = table.columns_to_skip + table.zones.len() * table.column_span;
    if table.columns.len() != expected {
        bail!(
            "shot location header levels disagree: {} bottom columns, \
             zone level implies {expected}",
            table.columns.len()
        );
    }

    let mut headers = Vec::with_capacity(table.columns.len());
    for (idx, column) in table.columns.iter().enumerate() {
        if idx < table.columns_to_skip {
            headers.push(column.trim().to_string());
        } else {
            let zone_idx = (idx - table.columns_to_skip) / table.column_span;
            headers.push(format!("{} {}", table.zones[zone_idx].trim(), column.trim()));
        }
    }

    Ok(StatFrame {
        headers,
        rows: table.rows.clone(),
    })
}

pub fn locate_shot_columns(frame: &StatFrame) -> Result<ShotColumns, PipelineError> {
    let rim_fga = find_containing_all(frame, &["Restricted Area", "FGA"])?;
    let mid_fga = find_containing_all(frame, &["Mid-Range", "FGA"])?;

    let three_fga = find_all_containing(frame, "3 FGA");
    if three_fga.is_empty() {
        return Err(PipelineError::schema_mismatch(&["3 FGA"]));
    }

    let all_fga = find_all_containing(frame, "FGA");

    Ok(ShotColumns {
        rim_fga,
        mid_fga,
        three_fga,
        all_fga,
    })
}

fn find_containing_all(frame: &StatFrame, needles: &[&str]) -> Result<usize, PipelineError> {
    frame
        .headers
        .iter()
        .position(|header| needles.iter().all(|needle| header.contains(needle)))
        .ok_or_else(|| PipelineError::schema_mismatch(needles))
}

fn find_all_containing(frame: &StatFrame, needle: &str) -> Vec<usize> {
    frame
        .headers
        .iter()
        .enumerate()
        .filter(|(_, header)| header.contains(needle))
        .map(|(idx, _)| idx)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use serde_json::json;

    fn sample_table() -> ShotLocationTable {
        ShotLocationTable {
            zones: vec![
                "Restricted Area".to_string(),
                "In The Paint (Non-RA)".to_string(),
                "Mid-Range".to_string(),
                "Left Corner 3".to_string(),
                "Right Corner 3".to_string(),
                "Above the Break 3".to_string(),
                "Backcourt".to_string(),
            ],
            columns_to_skip: 2,
            column_span: 3,
            columns: {
                let mut cols = vec!["TEAM_ID".to_string(), "TEAM_NAME".to_string()];
                for _ in 0..7 {
                    cols.push("FGM".to_string());
                    cols.push("FGA".to_string());
                    cols.push("FG_PCT".to_string());
                }
                cols
            },
            rows: vec![vec![json!(1), json!("Testers")]],
        }
    }

    #[test]
    fn flatten_joins_zone_and_field() {
        let frame = flatten(&sample_table()).expect("flatten should succeed");
        assert_eq!(frame.headers[0], "TEAM_ID");
        assert_eq!(frame.headers[1], "TEAM_NAME");
        assert_eq!(frame.headers[2], "Restricted Area FGM");
        assert_eq!(frame.headers[3], "Restricted Area FGA");
        assert_eq!(frame.headers[12], "Left Corner 3 FGA");
        assert_eq!(frame.headers.len(), 23);
    }

    #[test]
    fn flatten_rejects_ragged_levels() {
        let mut table = sample_table();
        table.columns.pop();
        assert!(flatten(&table).is_err());
    }

    #[test]
    fn locates_rim_mid_and_every_three_column() {
        let frame = flatten(&sample_table()).expect("flatten should succeed");
        let cols = locate_shot_columns(&frame).expect("columns should resolve");
        assert_eq!(frame.headers[cols.rim_fga], "Restricted Area FGA");
        assert_eq!(frame.headers[cols.mid_fga], "Mid-Range FGA");
        // Left corner, right corner, above the break.
        assert_eq!(cols.three_fga.len(), 3);
        // One FGA column per zone.
        assert_eq!(cols.all_fga.len(), 7);
    }

    #[test]
    fn renamed_zone_is_a_schema_mismatch() {
        let mut table = sample_table();
        table.zones[0] = "RestrictedArea".to_string();
        let frame = flatten(&table).expect("flatten should succeed");
        let err = locate_shot_columns(&frame).expect_err("rim lookup should fail");
        match &err {
            PipelineError::SchemaMismatch { needles } => {
                assert!(needles.iter().any(|n| n == "Restricted Area"));
            }
            other => panic!("expected SchemaMismatch, got {other:?}"),
        }
        assert!(err.to_string().contains("Restricted Area"));
    }

    #[test]
    fn missing_three_columns_is_a_schema_mismatch() {
        let mut table = sample_table();
        for zone in &mut table.zones {
            *zone = zone.replace('3', "Three");
        }
        let frame = flatten(&table).expect("flatten should succeed");
        let err = locate_shot_columns(&frame).expect_err("three lookup should fail");
        assert!(err.to_string().contains("3 FGA"));
    }
}
