//! Channelwise scaling
//!
//! Records are EEG matrices shaped (channels × samples). The wrapped scaler
//! sees them transposed, so every channel is scaled as its own feature.

use ndarray::{Array2, ArrayBase, Data, Dimension, Ix2};

use super::batch::{record_view, Batch};
use super::Transform;
use crate::error::TransformError;
use crate::scalers::IncrementalScaler;

/// Applies an [`IncrementalScaler`] to each channel of each record
#[derive(Clone, Debug, Default)]
pub struct ChannelwiseScaler<S> {
    scaler: S,
}

impl<S: IncrementalScaler> ChannelwiseScaler<S> {
    /// Wrap `scaler`; its accumulated state is kept
    #[must_use]
    pub fn new(scaler: S) -> Self {
        Self { scaler }
    }

    /// The wrapped scaler
    #[must_use]
    pub fn scaler(&self) -> &S {
        &self.scaler
    }

    /// Mutable access to the wrapped scaler (e.g. to reset it)
    pub fn scaler_mut(&mut self) -> &mut S {
        &mut self.scaler
    }

    /// Unwrap the scaler
    #[must_use]
    pub fn into_inner(self) -> S {
        self.scaler
    }
}

impl<S, T, D> Transform<Batch<ArrayBase<T, D>>> for ChannelwiseScaler<S>
where
    S: IncrementalScaler,
    T: Data<Elem = f64>,
    D: Dimension,
{
    type Output = Batch<Array2<f64>>;

    /// Accumulate per-channel statistics from every record.
    fn fit(
        &mut self,
        batch: &Batch<ArrayBase<T, D>>,
        _labels: Option<&[f64]>,
    ) -> Result<&mut Self, TransformError> {
        tracing::trace!(records = batch.len(), "fitting channelwise scaler");

        for (i, record) in batch.iter().enumerate() {
            let eeg = record_view::<_, _, Ix2>(record, i)?;
            self.scaler.partial_fit(eeg.t())?;
        }
        Ok(self)
    }

    fn transform(&self, batch: &Batch<ArrayBase<T, D>>) -> Result<Self::Output, TransformError> {
        batch.try_map(|i, record| {
            let eeg = record_view::<_, _, Ix2>(record, i)?;
            let scaled = self.scaler.transform(eeg.t())?;
            Ok(scaled.reversed_axes())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScalerError;
    use crate::scalers::{MinMaxScaler, StandardScaler};
    use ndarray::{array, Array1, Array3};

    fn eeg(channels: usize, samples: usize, seed: f64) -> Array2<f64> {
        Array2::from_shape_fn((channels, samples), |(c, t)| {
            (seed + c as f64 * 1.7 + t as f64 * 0.13).sin() * (10.0 + c as f64 * 25.0)
        })
    }

    #[test]
    fn test_min_max_bounds_per_channel() {
        let batch = Batch::Records(vec![eeg(4, 200, 0.0), eeg(4, 150, 3.0)]);
        let mut scaler = ChannelwiseScaler::new(MinMaxScaler::new());

        let out = scaler.fit_transform(&batch, None).unwrap();
        for record in &out {
            for channel in record.rows() {
                let min = channel.fold(f64::INFINITY, |m, &v| m.min(v));
                let max = channel.fold(f64::NEG_INFINITY, |m, &v| m.max(v));
                assert!(min >= -1e-12 && max <= 1.0 + 1e-12, "{min} {max}");
            }
        }
    }

    #[test]
    fn test_channels_scaled_independently() {
        let record = array![[0.0, 5.0, 10.0], [100.0, 200.0, 300.0]];
        let mut scaler = ChannelwiseScaler::new(MinMaxScaler::new());

        let out = scaler.fit_transform(&Batch::Single(record), None).unwrap();
        let expected = array![[0.0, 0.5, 1.0], [0.0, 0.5, 1.0]];
        assert_eq!(out, Batch::Single(expected));
    }

    #[test]
    fn test_shape_preserved_single_and_records() {
        let mut scaler = ChannelwiseScaler::new(StandardScaler::new());
        let single = Batch::Single(eeg(3, 64, 1.0));
        scaler.fit(&single, None).unwrap();

        let out = scaler.transform(&single).unwrap();
        assert!(matches!(out, Batch::Single(ref r) if r.dim() == (3, 64)));

        let records = Batch::Records(vec![eeg(3, 64, 2.0), eeg(3, 10, 4.0)]);
        let out = scaler.transform(&records).unwrap();
        let dims: Vec<(usize, usize)> = out.iter().map(Array2::dim).collect();
        assert_eq!(dims, vec![(3, 64), (3, 10)]);
    }

    #[test]
    fn test_stacked_batch() {
        let stacked = Array3::from_shape_fn((5, 2, 40), |(r, c, t)| (r * 100 + c * 10 + t) as f64);
        let batch = Batch::from_stacked(&stacked);
        let mut scaler = ChannelwiseScaler::new(StandardScaler::new());

        let out = scaler.fit_transform(&batch, None).unwrap();
        assert_eq!(out.len(), 5);
        assert!(out.iter().all(|r| r.dim() == (2, 40)));
    }

    #[test]
    fn test_fit_accumulates_across_batches() {
        let first = Batch::Records(vec![eeg(2, 50, 0.0)]);
        let second = Batch::Records(vec![eeg(2, 80, 5.0), eeg(2, 30, 9.0)]);
        let both = Batch::Records(vec![eeg(2, 50, 0.0), eeg(2, 80, 5.0), eeg(2, 30, 9.0)]);

        let mut incremental = ChannelwiseScaler::new(StandardScaler::new());
        incremental.fit(&first, None).unwrap();
        incremental.fit(&second, None).unwrap();

        let mut once = ChannelwiseScaler::new(StandardScaler::new());
        once.fit(&both, None).unwrap();

        assert_eq!(incremental.scaler().n_samples_seen(), 160);
        let (m1, m2): (&Array1<f64>, &Array1<f64>) =
            (incremental.scaler().mean().unwrap(), once.scaler().mean().unwrap());
        let (v1, v2) = (incremental.scaler().variance().unwrap(), once.scaler().variance().unwrap());
        for c in 0..2 {
            assert!((m1[c] - m2[c]).abs() < 1e-9);
            assert!((v1[c] - v2[c]).abs() < 1e-9 * v2[c].max(1.0));
        }
    }

    #[test]
    fn test_unfitted_scaler_error_propagates() {
        let scaler = ChannelwiseScaler::new(StandardScaler::new());
        let err = scaler.transform(&Batch::Single(eeg(2, 10, 0.0))).unwrap_err();
        assert_eq!(err, TransformError::Scaler(ScalerError::NotFitted { scaler: "StandardScaler" }));
    }

    #[test]
    fn test_channel_count_mismatch() {
        let mut scaler = ChannelwiseScaler::new(MinMaxScaler::new());
        scaler.fit(&Batch::Single(eeg(3, 20, 0.0)), None).unwrap();

        let err = scaler.transform(&Batch::Single(eeg(4, 20, 0.0))).unwrap_err();
        assert_eq!(err, TransformError::Scaler(ScalerError::FeatureMismatch { expected: 3, got: 4 }));
    }

    #[test]
    fn test_rejects_flat_record() {
        let mut scaler = ChannelwiseScaler::new(MinMaxScaler::new());
        let batch = Batch::Records(vec![Array1::<f64>::zeros(10)]);

        let err = scaler.fit(&batch, None).unwrap_err();
        assert_eq!(err, TransformError::ShapeMismatch { record: 0, expected: 2, got: 1 });
    }

    #[test]
    fn test_boxed_scaler_injection() {
        let boxed: Box<dyn IncrementalScaler> = Box::new(MinMaxScaler::new());
        let mut scaler = ChannelwiseScaler::new(boxed);

        let out = scaler.fit_transform(&Batch::Single(array![[2.0, 4.0]]), None).unwrap();
        assert_eq!(out, Batch::Single(array![[0.0, 1.0]]));
    }
}
