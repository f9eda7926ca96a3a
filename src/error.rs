use thiserror::Error;

/// Fatal pipeline failures. Each variant names the failing stage and the
/// offending input so the top-level diagnostic is useful without a backtrace.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("upstream {endpoint} unavailable for season {season}: {message}")]
    UpstreamUnavailable {
        endpoint: &'static str,
        season: String,
        message: String,
    },

    #[error("{frame} frame has no {column:?} column")]
    MissingColumn {
        frame: &'static str,
        column: &'static str,
    },

    #[error("schema mismatch: no shot-location column containing {}", .needles.join(" + "))]
    SchemaMismatch { needles: Vec<String> },

    #[error("join incomplete at {stage}: {joined} rows joined, inputs carry {expected} teams")]
    JoinIncomplete {
        stage: &'static str,
        expected: usize,
        joined: usize,
    },
}

impl PipelineError {
    pub fn schema_mismatch(needles: &[&str]) -> Self {
        PipelineError::SchemaMismatch {
            needles: needles.iter().map(|s| s.to_string()).collect(),
        }
    }
}
