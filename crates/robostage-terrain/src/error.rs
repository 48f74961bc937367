//! Terrain parameter errors.

use thiserror::Error;

/// Invalid generation parameters. Fatal to the generation call only.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterError {
    #[error("{name} must be finite and > 0, got {value}")]
    NonPositive { name: &'static str, value: f32 },

    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f32 },

    #[error("{name}: min {min} exceeds max {max}")]
    InvalidRange {
        name: &'static str,
        min: f32,
        max: f32,
    },

    #[error("grid of {rows}x{cols} cells is not supported (each side >= 2, at most {max} cells)")]
    Grid { rows: usize, cols: usize, max: usize },

    #[error("section {index}: {message}")]
    Section { index: usize, message: String },

    #[error("at least one {0} is required")]
    Empty(&'static str),

    #[error("height field sizes differ: {expected:?} vs {found:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
}

/// Check that `value` is finite and strictly positive.
pub(crate) fn positive(name: &'static str, value: f32) -> Result<f32, ParameterError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ParameterError::NonPositive { name, value })
    }
}

pub(crate) fn finite(name: &'static str, value: f32) -> Result<f32, ParameterError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ParameterError::NonFinite { name, value })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helpers_reject_bad_values() {
        assert_eq!(positive("width", 2.0), Ok(2.0));
        assert_eq!(
            positive("width", 0.0),
            Err(ParameterError::NonPositive {
                name: "width",
                value: 0.0
            })
        );
        assert!(positive("width", f32::INFINITY).is_err());
        assert!(finite("height", f32::NAN).is_err());
        assert_eq!(finite("height", -1.0), Ok(-1.0));
    }

    #[test]
    fn display_messages() {
        let e = ParameterError::NonPositive {
            name: "clearance",
            value: -1.0,
        };
        assert_eq!(e.to_string(), "clearance must be finite and > 0, got -1");
        assert_eq!(
            ParameterError::Empty("key point").to_string(),
            "at least one key point is required"
        );
    }
}
