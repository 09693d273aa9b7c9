//! Error types and result utilities for beat analysis.
//!
//! Only invalid configuration is an error. A recording in which no beats can
//! be found is an ordinary outcome and is reported through
//! [`RateEstimate::NotDetected`](crate::RateEstimate::NotDetected).

use thiserror::Error;

/// Convenience type alias for results that may contain an [`EscapementError`].
pub type EscapementResult<T> = Result<T, EscapementError>;

/// Error types that can occur while configuring or running the analysis.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EscapementError {
    /// A parameter supplied to a stage or to the pipeline is invalid.
    #[error(transparent)]
    Parameter(#[from] ParameterError),

    /// An interleaved buffer does not split evenly into whole frames.
    #[error("Interleaved buffer of {len} samples does not divide into {channels} channels")]
    InterleavedLayout {
        /// Total number of interleaved samples
        len: usize,
        /// Number of channels the buffer claims to hold
        channels: usize,
    },

    /// A WAV file could not be read or uses an unsupported sample format.
    #[cfg(feature = "wav")]
    #[error("WAV error: {0}")]
    Wav(String),

    /// A report could not be converted to or from JSON.
    #[cfg(feature = "serialization")]
    #[error("Serialization error: {0}")]
    Serialization(String),
}

#[cfg(feature = "serialization")]
impl From<serde_json::Error> for EscapementError {
    fn from(err: serde_json::Error) -> Self {
        EscapementError::Serialization(err.to_string())
    }
}

/// An invalid configuration value, detected before any processing starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid parameter '{parameter}': {reason}")]
pub struct ParameterError {
    /// Name of the parameter as it appears in [`DetectorConfig`](crate::DetectorConfig)
    pub parameter: &'static str,
    /// Human readable description of the violated constraint
    pub reason: String,
}

impl ParameterError {
    /// Creates an error for a parameter whose value violates a constraint.
    pub fn invalid_value(parameter: &'static str, reason: impl Into<String>) -> Self {
        Self {
            parameter,
            reason: reason.into(),
        }
    }

    /// Creates an error for a parameter that must be strictly positive.
    pub fn not_positive(parameter: &'static str, value: impl std::fmt::Display) -> Self {
        Self::invalid_value(parameter, format!("must be greater than 0, got {value}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_error_message() {
        let err = ParameterError::not_positive("peak_width", 0);
        assert_eq!(
            err.to_string(),
            "Invalid parameter 'peak_width': must be greater than 0, got 0"
        );
    }

    #[test]
    fn test_parameter_error_converts() {
        let err: EscapementError = ParameterError::invalid_value("threshold", "too small").into();
        assert!(matches!(
            err,
            EscapementError::Parameter(ParameterError {
                parameter: "threshold",
                ..
            })
        ));
        assert_eq!(err.to_string(), "Invalid parameter 'threshold': too small");
    }

    #[test]
    fn test_interleaved_layout_message() {
        let err = EscapementError::InterleavedLayout {
            len: 7,
            channels: 2,
        };
        assert_eq!(
            err.to_string(),
            "Interleaved buffer of 7 samples does not divide into 2 channels"
        );
    }
}
