//! EEG Models - Preprocessing transforms for EEG batches
//!
//! This crate turns raw multi-channel time series into model-ready arrays:
//! - Zero-phase Butterworth band-pass filtering
//! - Anti-aliased decimation
//! - Channelwise scaling with incremental scalers
//! - Marker channels to `(index, label)` events
//!
//! # Modules
//!
//! - [`transforms`]: The [`Transform`] contract, [`Batch`] and the stages
//! - [`scalers`]: Incremental standard and min-max scalers
//! - [`config`]: Serde hyperparameter configurations
//! - [`error`]: Error types
//!
//! # Example
//!
//! ```rust
//! use eeg_models::{Batch, ButterFilter, Decimator, Transform};
//! use ndarray::Array1;
//!
//! let record = Array1::from_shape_fn(1000, |i| (i as f64 * 0.3).sin());
//! let batch = Batch::Records(vec![record.clone(), record.slice(ndarray::s![..600]).to_owned()]);
//!
//! let filtered = ButterFilter::new(250, 4, 1.0, 40.0)?.transform(&batch)?;
//! let decimated = Decimator::new(2)?.transform(&filtered)?;
//!
//! let lens: Vec<usize> = decimated.iter().map(Array1::len).collect();
//! assert_eq!(lens, vec![500, 300]);
//! # Ok::<(), eeg_models::TransformError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]

pub mod config;
pub mod error;
pub mod scalers;
pub mod transforms;

// Re-export key types
pub use config::{
    BandpassConfig, DecimatorConfig, MarkersConfig, PreprocessingConfig, PreprocessingStages,
    ScalerConfig,
};
pub use error::{ScalerError, TransformError};
pub use scalers::{IncrementalScaler, MinMaxScaler, StandardScaler};
pub use transforms::butter::ButterFilter;
pub use transforms::decimate::Decimator;
pub use transforms::markers::{LabelsMapping, MarkersTransformer};
pub use transforms::scaling::ChannelwiseScaler;
pub use transforms::{Batch, Transform};

pub use eeg_models_core::{DspError, FilterCoefficients};
