//! Trajectory loading errors.

use std::path::PathBuf;

use robostage_core::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum TrajectoryError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A wide trajectory has no column with the configured time name.
    #[error("missing time column {0:?}")]
    MissingTimeColumn(String),

    /// A headerless wide trajectory was read without joint names.
    #[error("headerless trajectory needs explicit joint names")]
    MissingJointNames,

    /// A record has a different number of fields than the layout expects.
    #[error("row {row}: expected {expected} fields, found {found}")]
    FieldCount {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("row {row}, column {column}: {value:?} is not a number")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    /// Sample times must strictly increase.
    #[error("row {row}: time {time} does not follow {previous}")]
    NotMonotonic { row: usize, time: f32, previous: f32 },

    #[error("trajectory has no samples")]
    Empty,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let e = TrajectoryError::NotMonotonic {
            row: 3,
            time: 0.5,
            previous: 1.0,
        };
        assert_eq!(e.to_string(), "row 3: time 0.5 does not follow 1");

        let e = TrajectoryError::InvalidValue {
            row: 2,
            column: "elbow".into(),
            value: "abc".into(),
        };
        assert_eq!(e.to_string(), r#"row 2, column elbow: "abc" is not a number"#);

        assert_eq!(
            TrajectoryError::MissingTimeColumn("t".into()).to_string(),
            r#"missing time column "t""#
        );
    }
}
