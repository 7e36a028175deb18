//! Error types for filter design and application
//!
//! Every error carries the offending values so callers can report them
//! without re-deriving context.

use thiserror::Error;

/// Errors from IIR design, transfer-function filtering and decimation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DspError {
    /// Filter order must be at least 1
    #[error("Invalid filter order: {order}")]
    InvalidOrder {
        /// Requested order
        order: u32,
    },

    /// Normalized cutoffs must satisfy 0 < low < high < 1
    #[error("Invalid normalized cutoff ({low}, {high}): expected 0 < low < high < 1")]
    InvalidCutoff {
        /// Lower edge as a fraction of Nyquist
        low: f64,
        /// Upper edge as a fraction of Nyquist
        high: f64,
    },

    /// Low-pass cutoff must satisfy 0 < cutoff < 1
    #[error("Invalid normalized low-pass cutoff {cutoff}: expected 0 < cutoff < 1")]
    InvalidLowpass {
        /// Cutoff as a fraction of Nyquist
        cutoff: f64,
    },

    /// Pass-band ripple must be positive and finite
    #[error("Invalid pass-band ripple: {ripple_db} dB")]
    InvalidRipple {
        /// Requested ripple in dB
        ripple_db: f64,
    },

    /// Denominator is empty or its leading coefficient is zero
    #[error("Invalid filter coefficients: {reason}")]
    InvalidCoefficients {
        /// What is wrong with the coefficients
        reason: &'static str,
    },

    /// Downsampling factor must be at least 1
    #[error("Invalid decimation factor: {factor}")]
    InvalidFactor {
        /// Requested factor
        factor: usize,
    },

    /// Input is too short for the padding required by `filtfilt`
    #[error("Signal too short for zero-phase filtering: {len} samples, need more than {padlen}")]
    SignalTooShort {
        /// Number of samples received
        len: usize,
        /// Padding length applied at each edge
        padlen: usize,
    },

    /// Initial filter state has the wrong number of delays
    #[error("Filter state length mismatch: got {got}, expected {expected}")]
    StateLength {
        /// Number of delays provided
        got: usize,
        /// Number of delays the filter has
        expected: usize,
    },

    /// Steady-state initial conditions could not be solved
    #[error("Singular system while computing initial filter state")]
    SingularSystem,
}
