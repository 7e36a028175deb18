//! Anti-aliased downsampling
//!
//! Each record is low-pass filtered (order-8 Chebyshev I, zero-phase) and
//! every `factor`-th sample is kept. Output records are independent
//! buffers, so a `Records` batch may be ragged.

use eeg_models_core::filter::MAX_STABLE_DECIMATION_FACTOR;
use eeg_models_core::FilterCoefficients;
use ndarray::{Array1, ArrayBase, Data, Dimension, Ix1};

use super::batch::{record_view, Batch};
use super::Transform;
use crate::error::TransformError;

/// Integer-factor decimator
#[derive(Clone, Debug, PartialEq)]
pub struct Decimator {
    factor: usize,
    lowpass: FilterCoefficients,
}

impl Decimator {
    /// Create a decimator.
    ///
    /// Factors above 13 are accepted but the anti-aliasing filter loses
    /// accuracy; decimate in several smaller steps instead.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::InvalidParameter`] if `factor` is zero.
    pub fn new(factor: usize) -> Result<Self, TransformError> {
        if factor == 0 {
            return Err(TransformError::InvalidParameter {
                parameter: "factor",
                reason: "must be at least 1".into(),
            });
        }
        if factor > MAX_STABLE_DECIMATION_FACTOR {
            tracing::warn!(
                factor,
                max = MAX_STABLE_DECIMATION_FACTOR,
                "decimation factor exceeds stable range, consider decimating in stages"
            );
        }

        let lowpass = FilterCoefficients::decimation_lowpass(factor)?;
        tracing::debug!(factor, taps = lowpass.num_taps(), "created decimator");

        Ok(Self { factor, lowpass })
    }

    /// Downsampling factor
    #[must_use]
    pub fn factor(&self) -> usize {
        self.factor
    }

    /// Whether the factor is small enough for a single-stage filter
    #[must_use]
    pub fn is_within_stable_range(&self) -> bool {
        self.factor <= MAX_STABLE_DECIMATION_FACTOR
    }

    /// Anti-aliasing low-pass coefficients
    #[must_use]
    pub fn coefficients(&self) -> &FilterCoefficients {
        &self.lowpass
    }

    /// Length of a record after decimation
    #[must_use]
    pub fn output_len(&self, input_len: usize) -> usize {
        input_len.div_ceil(self.factor)
    }

    /// Decimate one flat signal.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::Dsp`] if the signal is too short to filter.
    pub fn decimate_signal(&self, signal: &[f64]) -> Result<Vec<f64>, TransformError> {
        Ok(self.lowpass.decimate(signal, self.factor)?)
    }
}

impl<S, D> Transform<Batch<ArrayBase<S, D>>> for Decimator
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    type Output = Batch<Array1<f64>>;

    fn transform(&self, batch: &Batch<ArrayBase<S, D>>) -> Result<Self::Output, TransformError> {
        tracing::trace!(records = batch.len(), factor = self.factor, "decimating batch");

        batch.try_map(|i, record| {
            let signal = record_view::<_, _, Ix1>(record, i)?;
            Ok(Array1::from(self.decimate_signal(&signal.to_vec())?))
        })
    }
}
