use crate::team_table::TeamRow;

/// The six style metrics on the radar, in display order starting from the
/// top axis. Style only: outcome metrics (ratings, record) stay in the
/// chart title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadarMetric {
    Pace,
    ThreePointAttemptRate,
    RimRate,
    MidRate,
    FreeThrowRate,
    OffensiveReboundPct,
}

pub const RADAR_METRICS: [RadarMetric; 6] = [
    RadarMetric::Pace,
    RadarMetric::ThreePointAttemptRate,
    RadarMetric::RimRate,
    RadarMetric::MidRate,
    RadarMetric::FreeThrowRate,
    RadarMetric::OffensiveReboundPct,
];

/// Midpoint used when the whole league is tied on a metric.
pub const DEGENERATE_NORM: f64 = 5.0;

impl RadarMetric {
    pub fn label(self) -> &'static str {
        match self {
            RadarMetric::Pace => "Pace",
            RadarMetric::ThreePointAttemptRate => "3-Pt Attempt Rate",
            RadarMetric::RimRate => "Rim Attempt Rate",
            RadarMetric::MidRate => "Mid-Range Rate",
            RadarMetric::FreeThrowRate => "Free Throw Rate",
            RadarMetric::OffensiveReboundPct => "Off. Rebound %",
        }
    }

    pub fn value(self, row: &TeamRow) -> f64 {
        match self {
            RadarMetric::Pace => row.pace,
            RadarMetric::ThreePointAttemptRate => row.three_point_attempt_rate,
            RadarMetric::RimRate => row.rim_rate,
            RadarMetric::MidRate => row.mid_rate,
            RadarMetric::FreeThrowRate => row.free_throw_rate,
            RadarMetric::OffensiveReboundPct => row.offensive_rebound_pct,
        }
    }
}

/// One joined team row plus its league-relative [0,10] values, aligned
/// with `RADAR_METRICS`.
#[derive(Debug, Clone)]
pub struct RadarRow {
    pub team: TeamRow,
    pub norms: [f64; RADAR_METRICS.len()],
}

/// Min-max rescale each radar metric over the league to [0,10].
///
/// League-relative on purpose: viewers read "far from center" as "extreme
/// in the league", and min-max makes that literal. A metric with zero
/// league range pins every team to the midpoint.
pub fn normalize_league(rows: Vec<TeamRow>) -> Vec<RadarRow> {
    let mut out: Vec<RadarRow> = rows
        .into_iter()
        .map(|team| RadarRow {
            team,
            norms: [DEGENERATE_NORM; RADAR_METRICS.len()],
        })
        .collect();

    for (slot, metric) in RADAR_METRICS.iter().enumerate() {
        let lo = out
            .iter()
            .map(|row| metric.value(&row.team))
            .fold(f64::INFINITY, f64::min);
        let hi = out
            .iter()
            .map(|row| metric.value(&row.team))
            .fold(f64::NEG_INFINITY, f64::max);
        let range = hi - lo;

        for row in &mut out {
            row.norms[slot] = if range == 0.0 {
                DEGENERATE_NORM
            } else {
                (metric.value(&row.team) - lo) / range * 10.0
            };
        }
    }

    out
}
