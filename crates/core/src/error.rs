//! Error type shared by every fallible operation in the crate

use std::fmt;

/// Errors produced while validating inputs or running the classifier.
///
/// Both kinds are recoverable: a caller reports the message for the failed
/// evaluation and carries on with the next one.
#[derive(Debug, Clone, PartialEq)]
pub enum RiskError {
    /// A field was out of range, non-finite or not one of its enumerated symbols
    InvalidInput {
        /// Name of the offending field (e.g. `"rainfall"`, `"recent_level"`)
        field: &'static str,
        /// What was wrong with it
        reason: String,
    },
    /// The classifier could not be loaded or returned an unusable prediction
    ModelUnavailable(String),
}

impl RiskError {
    /// Convenience constructor for [`RiskError::InvalidInput`]
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        RiskError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// Convenience constructor for [`RiskError::ModelUnavailable`]
    pub fn model(reason: impl Into<String>) -> Self {
        RiskError::ModelUnavailable(reason.into())
    }

    /// True for input validation failures
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, RiskError::InvalidInput { .. })
    }
}

impl fmt::Display for RiskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskError::InvalidInput { field, reason } => {
                write!(f, "Invalid input '{field}': {reason}")
            }
            RiskError::ModelUnavailable(msg) => write!(f, "Model unavailable: {msg}"),
        }
    }
}

impl std::error::Error for RiskError {}

/// Reject NaN and infinities.
pub(crate) fn require_finite(field: &'static str, value: f64) -> Result<f64, RiskError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(RiskError::invalid(field, format!("must be finite, got {value}")))
    }
}

/// Require a finite value that is zero or greater.
pub(crate) fn require_non_negative(field: &'static str, value: f64) -> Result<f64, RiskError> {
    require_finite(field, value)?;
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(RiskError::invalid(
            field,
            format!("must be non-negative, got {value}"),
        ))
    }
}

/// Require a finite value inside the closed interval `[min, max]`.
pub(crate) fn require_range(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<f64, RiskError> {
    require_finite(field, value)?;
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(RiskError::invalid(
            field,
            format!("must be between {min} and {max}, got {value}"),
        ))
    }
}
