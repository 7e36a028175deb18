//! Zero-phase Butterworth band-pass
//!
//! Coefficients are designed once at construction and reused for every
//! record.

use eeg_models_core::design::butter_bandpass;
use eeg_models_core::FilterCoefficients;
use ndarray::{Array1, ArrayBase, Data, Dimension, Ix1};

use super::batch::{record_view, Batch};
use super::Transform;
use crate::error::TransformError;

/// Butterworth band-pass applied forward and backward to each record
#[derive(Clone, Debug, PartialEq)]
pub struct ButterFilter {
    sampling_rate: u32,
    order: u32,
    highpass: f64,
    lowpass: f64,
    coeffs: FilterCoefficients,
}

impl ButterFilter {
    /// Create a band-pass filter.
    ///
    /// # Arguments
    ///
    /// * `sampling_rate` - Sample rate in Hz
    /// * `order` - Butterworth order (the transfer function has `2 * order + 1` taps)
    /// * `highpass` - Lower band edge in Hz
    /// * `lowpass` - Upper band edge in Hz
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::InvalidParameter`] for a zero sampling
    /// rate or order, and [`TransformError::InvalidBand`] unless
    /// `0 < highpass < lowpass < sampling_rate / 2`.
    pub fn new(
        sampling_rate: u32,
        order: u32,
        highpass: f64,
        lowpass: f64,
    ) -> Result<Self, TransformError> {
        if sampling_rate == 0 {
            return Err(TransformError::InvalidParameter {
                parameter: "sampling_rate",
                reason: "must be positive".into(),
            });
        }
        if order == 0 {
            return Err(TransformError::InvalidParameter {
                parameter: "order",
                reason: "must be positive".into(),
            });
        }

        let nyquist = 0.5 * f64::from(sampling_rate);
        if !(highpass > 0.0 && highpass < lowpass && lowpass < nyquist) {
            return Err(TransformError::InvalidBand { highpass, lowpass, nyquist });
        }

        let coeffs = butter_bandpass(order, highpass / nyquist, lowpass / nyquist)?;
        tracing::debug!(sampling_rate, order, highpass, lowpass, "created Butterworth band-pass");

        Ok(Self { sampling_rate, order, highpass, lowpass, coeffs })
    }

    /// Sample rate in Hz
    #[must_use]
    pub fn sampling_rate(&self) -> u32 {
        self.sampling_rate
    }

    /// Butterworth order
    #[must_use]
    pub fn order(&self) -> u32 {
        self.order
    }

    /// Lower band edge in Hz
    #[must_use]
    pub fn highpass(&self) -> f64 {
        self.highpass
    }

    /// Upper band edge in Hz
    #[must_use]
    pub fn lowpass(&self) -> f64 {
        self.lowpass
    }

    /// Designed transfer-function coefficients
    #[must_use]
    pub fn coefficients(&self) -> &FilterCoefficients {
        &self.coeffs
    }

    /// Shortest record this filter accepts (exclusive bound)
    #[must_use]
    pub fn min_record_len(&self) -> usize {
        self.coeffs.padlen() + 1
    }

    /// Filter one flat signal.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::Dsp`] if the signal is too short.
    pub fn filter_signal(&self, signal: &[f64]) -> Result<Vec<f64>, TransformError> {
        Ok(self.coeffs.filtfilt(signal)?)
    }
}

impl<S, D> Transform<Batch<ArrayBase<S, D>>> for ButterFilter
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    type Output = Batch<Array1<f64>>;

    fn transform(&self, batch: &Batch<ArrayBase<S, D>>) -> Result<Self::Output, TransformError> {
        tracing::trace!(records = batch.len(), "band-pass filtering batch");

        batch.try_map(|i, record| {
            let signal = record_view::<_, _, Ix1>(record, i)?;
            let filtered = self.filter_signal(&signal.to_vec())?;
            Ok(Array1::from(filtered))
        })
    }
}
