//! Error types for transforms and scalers
//!
//! Error types for construction, shape checks and scaler state using
//! `thiserror`.

use eeg_models_core::DspError;
use thiserror::Error;

/// Scaler error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScalerError {
    /// `transform` called before any `partial_fit`
    #[error("{scaler} is not fitted yet: call partial_fit before transform")]
    NotFitted {
        /// Scaler type name
        scaler: &'static str,
    },

    /// Input feature count differs from the fitted one
    #[error("Feature count mismatch: scaler fitted on {expected} features, got {got}")]
    FeatureMismatch {
        /// Features seen during fitting
        expected: usize,
        /// Features in the rejected input
        got: usize,
    },

    /// Min-max target range is empty or inverted
    #[error("Invalid feature range ({min}, {max}): min must be smaller than max")]
    InvalidFeatureRange {
        /// Requested lower bound
        min: f64,
        /// Requested upper bound
        max: f64,
    },
}

/// Transform error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    /// Hyperparameter out of its valid domain
    #[error("Invalid parameter {parameter}: {reason}")]
    InvalidParameter {
        /// Parameter name
        parameter: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// Band edges violate 0 < highpass < lowpass < Nyquist
    #[error("Invalid band {highpass}-{lowpass} Hz: expected 0 < highpass < lowpass < {nyquist} Hz")]
    InvalidBand {
        /// Highpass edge in Hz
        highpass: f64,
        /// Lowpass edge in Hz
        lowpass: f64,
        /// Nyquist frequency in Hz
        nyquist: f64,
    },

    /// Record dimensionality differs from what the transform expects
    #[error("Record {record} has {got} dimensions, expected {expected}")]
    ShapeMismatch {
        /// Position of the record in the batch
        record: usize,
        /// Required number of dimensions
        expected: usize,
        /// Number of dimensions received
        got: usize,
    },

    /// Marker value absent from the labels mapping
    #[error("Marker value {value} at sample {index} of record {record} has no label")]
    UnmappedMarker {
        /// Position of the record in the batch
        record: usize,
        /// Sample index within the record
        index: usize,
        /// Raw marker value
        value: f64,
    },

    /// Filter design or application failed
    #[error(transparent)]
    Dsp(#[from] DspError),

    /// Wrapped scaler failed
    #[error(transparent)]
    Scaler(#[from] ScalerError),
}
