//! Hyperparameter configurations
//!
//! Plain serde structs for every transform, so stage settings can be loaded
//! from any serde format. Missing fields fall back to defaults; validation
//! runs in `build()`, through the same constructors used directly.

use serde::{Deserialize, Serialize};

use crate::error::TransformError;
use crate::scalers::{IncrementalScaler, MinMaxScaler, StandardScaler};
use crate::transforms::butter::ButterFilter;
use crate::transforms::decimate::Decimator;
use crate::transforms::markers::{
    LabelsMapping, MarkersTransformer, DEFAULT_DECIMATION_FACTOR, DEFAULT_EMPTY_LABEL,
};
use crate::transforms::scaling::ChannelwiseScaler;

// ============================================================================
// Filtering and Decimation
// ============================================================================

/// Butterworth band-pass settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandpassConfig {
    /// Sample rate in Hz
    pub sampling_rate: u32,
    /// Butterworth order
    pub order: u32,
    /// Lower band edge in Hz
    pub highpass: f64,
    /// Upper band edge in Hz
    pub lowpass: f64,
}

impl Default for BandpassConfig {
    fn default() -> Self {
        Self { sampling_rate: 250, order: 4, highpass: 0.5, lowpass: 40.0 }
    }
}

impl BandpassConfig {
    /// Design the filter.
    ///
    /// # Errors
    ///
    /// Same as [`ButterFilter::new`].
    pub fn build(&self) -> Result<ButterFilter, TransformError> {
        ButterFilter::new(self.sampling_rate, self.order, self.highpass, self.lowpass)
    }
}

/// Decimator settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecimatorConfig {
    /// Downsampling factor
    pub factor: usize,
}

impl Default for DecimatorConfig {
    fn default() -> Self {
        Self { factor: 1 }
    }
}

impl DecimatorConfig {
    /// Build the decimator.
    ///
    /// # Errors
    ///
    /// Same as [`Decimator::new`].
    pub fn build(&self) -> Result<Decimator, TransformError> {
        Decimator::new(self.factor)
    }
}

// ============================================================================
// Scaling
// ============================================================================

/// Scaler selection for [`ChannelwiseScaler`]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalerConfig {
    /// Zero mean, unit variance per channel
    Standard {
        /// Subtract the running mean
        #[serde(default = "enabled")]
        with_mean: bool,
        /// Divide by the running standard deviation
        #[serde(default = "enabled")]
        with_std: bool,
    },
    /// Linear map of each channel's observed range
    MinMax {
        /// Target `(min, max)`
        #[serde(default = "unit_range")]
        feature_range: (f64, f64),
    },
}

fn enabled() -> bool {
    true
}

fn unit_range() -> (f64, f64) {
    (0.0, 1.0)
}

impl Default for ScalerConfig {
    fn default() -> Self {
        Self::Standard { with_mean: true, with_std: true }
    }
}

impl ScalerConfig {
    /// Build an unfitted channelwise scaler.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::Scaler`] for an invalid min-max range.
    pub fn build(&self) -> Result<ChannelwiseScaler<Box<dyn IncrementalScaler>>, TransformError> {
        let scaler: Box<dyn IncrementalScaler> = match *self {
            Self::Standard { with_mean, with_std } => {
                Box::new(StandardScaler::with_options(with_mean, with_std))
            }
            Self::MinMax { feature_range: (min, max) } => {
                Box::new(MinMaxScaler::with_range(min, max)?)
            }
        };
        Ok(ChannelwiseScaler::new(scaler))
    }
}

// ============================================================================
// Markers
// ============================================================================

/// Marker conversion settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkersConfig<L> {
    /// `[[value, label], ...]`; later pairs shadow earlier ones
    pub labels_mapping: LabelsMapping<L>,
    /// Divisor applied to event indices
    pub decimation_factor: usize,
    /// Marker value meaning "no event"
    pub empty_label: f64,
}

impl<L> Default for MarkersConfig<L> {
    fn default() -> Self {
        Self {
            labels_mapping: LabelsMapping::new(),
            decimation_factor: DEFAULT_DECIMATION_FACTOR,
            empty_label: DEFAULT_EMPTY_LABEL,
        }
    }
}

impl<L: Clone> MarkersConfig<L> {
    /// Build the transformer.
    ///
    /// # Errors
    ///
    /// Same as [`MarkersTransformer::new`].
    pub fn build(&self) -> Result<MarkersTransformer<L>, TransformError> {
        MarkersTransformer::new(self.labels_mapping.clone(), self.decimation_factor, self.empty_label)
    }
}

// ============================================================================
// Stage Group
// ============================================================================

/// Settings for every preprocessing stage; absent stages are skipped.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessingConfig<L = String> {
    /// Band-pass filter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bandpass: Option<BandpassConfig>,
    /// Decimation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decimator: Option<DecimatorConfig>,
    /// Channelwise scaling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scaler: Option<ScalerConfig>,
    /// Marker channel conversion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markers: Option<MarkersConfig<L>>,
}

impl<L> Default for PreprocessingConfig<L> {
    fn default() -> Self {
        Self { bandpass: None, decimator: None, scaler: None, markers: None }
    }
}

/// Stages built from a [`PreprocessingConfig`]
pub struct PreprocessingStages<L> {
    /// Band-pass filter
    pub bandpass: Option<ButterFilter>,
    /// Decimation
    pub decimator: Option<Decimator>,
    /// Channelwise scaling
    pub scaler: Option<ChannelwiseScaler<Box<dyn IncrementalScaler>>>,
    /// Marker channel conversion
    pub markers: Option<MarkersTransformer<L>>,
}

impl<L: Clone> PreprocessingConfig<L> {
    /// Build every configured stage.
    ///
    /// A markers decimation factor that differs from the decimator's factor
    /// is logged, since event indices would no longer line up with samples.
    ///
    /// # Errors
    ///
    /// Returns the first stage construction error.
    pub fn build(&self) -> Result<PreprocessingStages<L>, TransformError> {
        if let (Some(decimator), Some(markers)) = (&self.decimator, &self.markers) {
            if decimator.factor != markers.decimation_factor {
                tracing::warn!(
                    decimator = decimator.factor,
                    markers = markers.decimation_factor,
                    "markers decimation factor differs from signal decimation"
                );
            }
        }

        Ok(PreprocessingStages {
            bandpass: self.bandpass.as_ref().map(BandpassConfig::build).transpose()?,
            decimator: self.decimator.as_ref().map(DecimatorConfig::build).transpose()?,
            scaler: self.scaler.as_ref().map(ScalerConfig::build).transpose()?,
            markers: self.markers.as_ref().map(MarkersConfig::build).transpose()?,
        })
    }
}
