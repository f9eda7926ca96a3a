use anyhow::{bail, Result};

pub const DEFAULT_SEASON: &str = "2024-25";

/// A season label is `YYYY-YY` where the suffix is the two-digit year
/// immediately following the first, e.g. "2024-25" or "1999-00".
pub fn validate_season_label(label: &str) -> Result<()> {
    let Some((start, end)) = label.split_once('-') else {
        bail!("invalid season label {label:?}: expected YYYY-YY");
    };
    if start.len() != 4 || end.len() != 2 {
        bail!("invalid season label {label:?}: expected YYYY-YY");
    }
    let Ok(start_year) = start.parse::<u32>() else {
        bail!("invalid season label {label:?}: expected YYYY-YY");
    };
    let Ok(end_year) = end.parse::<u32>() else {
        bail!("invalid season label {label:?}: expected YYYY-YY");
    };
    if (start_year + 1) % 100 != end_year {
        bail!(
            "invalid season label {label:?}: {end} does not follow {start}"
        );
    }
    Ok(())
}
