//! Range validation shared by pattern constructors and match setters.
//!
//! Scores, thresholds and impacts all live in the unit interval. Length
//! bounds of flexible patterns must be ordered and the length increment must
//! be positive. These checks run when a pattern is configured, never while
//! matching.

use thiserror::Error;

/// Tolerance used when comparing accumulated floating point scores.
pub const SCORE_EPSILON: f64 = 1e-9;

/// Configuration errors raised by constructors and setters
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Threshold out of range: {0} (expected 0.0..=1.0)")]
    ThresholdOutOfRange(f64),

    #[error("Impact out of range: {0} (expected 0.0..=1.0)")]
    ImpactOutOfRange(f64),

    #[error("Similarity must be between 0.0 and 1.0 inclusive, got {0}")]
    SimilarityOutOfRange(f64),

    #[error("Invalid pairing weight: {0} (expected 0.0..=1.0)")]
    PairingWeightOutOfRange(f64),

    #[error("Maximum length {max} smaller than minimum length {min}")]
    InvalidLengthBounds { min: usize, max: usize },

    #[error("Length increment must be greater than zero, got {0}")]
    InvalidLengthIncrement(f64),

    #[error("Minimum gap {min} is greater than maximum gap {max}")]
    InvalidGapBounds { min: usize, max: usize },

    #[error("Gap without reference or alignment to a preceding element")]
    GapWithoutReference,

    #[error("Iteration bounds invalid: minimum {min}, maximum {max}")]
    InvalidIterationBounds { min: usize, max: usize },

    #[error("Weight table must not be empty")]
    EmptyWeights,
}

fn in_unit_interval(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

/// Validate a similarity threshold.
///
/// # Errors
///
/// Returns `ValidationError::ThresholdOutOfRange` if the value is not in [0, 1].
pub fn validate_threshold(threshold: f64) -> Result<f64, ValidationError> {
    if in_unit_interval(threshold) {
        Ok(threshold)
    } else {
        Err(ValidationError::ThresholdOutOfRange(threshold))
    }
}

/// Validate an impact weight.
///
/// # Errors
///
/// Returns `ValidationError::ImpactOutOfRange` if the value is not in [0, 1].
pub fn validate_impact(impact: f64) -> Result<f64, ValidationError> {
    if in_unit_interval(impact) {
        Ok(impact)
    } else {
        Err(ValidationError::ImpactOutOfRange(impact))
    }
}

/// Validate a similarity score assigned to a match.
///
/// # Errors
///
/// Returns `ValidationError::SimilarityOutOfRange` if the value is not in [0, 1].
pub fn validate_similarity(similarity: f64) -> Result<f64, ValidationError> {
    if in_unit_interval(similarity) {
        Ok(similarity)
    } else {
        Err(ValidationError::SimilarityOutOfRange(similarity))
    }
}

/// Validate the length bounds of a flexible pattern.
///
/// # Errors
///
/// Returns `ValidationError::InvalidLengthBounds` if `max < min` and
/// `ValidationError::InvalidLengthIncrement` if the increment is not a
/// positive finite number.
pub fn validate_length_bounds(min: usize, max: usize, step: f64) -> Result<(), ValidationError> {
    if max < min {
        return Err(ValidationError::InvalidLengthBounds { min, max });
    }
    if !(step.is_finite() && step > 0.0) {
        return Err(ValidationError::InvalidLengthIncrement(step));
    }
    Ok(())
}

/// Clamp a computed score into the unit interval.
///
/// Scores produced by the matchers are mathematically bounded, but sums of
/// floating point weights can drift slightly outside [0, 1].
#[must_use]
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
