//! EEG Models Core - IIR filter design and zero-phase filtering
//!
//! This crate provides the digital filter primitives used by the
//! `eeg-models` preprocessing transforms. All routines work on plain `f64`
//! slices and return owned buffers.
//!
//! # Modules
//!
//! - [`design`]: Butterworth / Chebyshev type I design (zpk → transfer function)
//! - [`filter`]: Transfer-function filtering, `filtfilt` and decimation
//! - [`error`]: Error types for design and filtering
//!
//! # Example
//!
//! ```rust
//! use eeg_models_core::design::butter_bandpass;
//!
//! // 4th order 8-30 Hz band at 250 Hz (cutoffs normalized to Nyquist)
//! let coeffs = butter_bandpass(4, 8.0 / 125.0, 30.0 / 125.0).unwrap();
//! assert_eq!(coeffs.b().len(), 9);
//!
//! let signal: Vec<f64> = (0..500)
//!     .map(|i| (2.0 * std::f64::consts::PI * 15.0 * i as f64 / 250.0).sin())
//!     .collect();
//! let filtered = coeffs.filtfilt(&signal).unwrap();
//! assert_eq!(filtered.len(), signal.len());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]

pub mod design;
pub mod error;
pub mod filter;

// Re-export commonly used types at crate root
pub use design::{butter_bandpass, cheby1_lowpass, Zpk};
pub use error::DspError;
pub use filter::{decimate, FilterCoefficients};
