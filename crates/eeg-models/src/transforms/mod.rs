//! Fit/transform preprocessing stages
//!
//! This module provides the transforms applied to EEG batches:
//! - [`butter`]: Zero-phase Butterworth band-pass
//! - [`decimate`]: Anti-aliased downsampling
//! - [`scaling`]: Per-channel scaling with an incremental scaler
//! - [`markers`]: Marker channels to `(index, label)` events
//!
//! Every stage implements [`Transform`], so stateless and stateful stages
//! can be driven the same way.

pub mod batch;
pub mod butter;
pub mod decimate;
pub mod markers;
pub mod scaling;

pub use batch::Batch;

use crate::error::TransformError;

/// Fit/transform contract shared by all preprocessing stages.
///
/// `In` is the batch type accepted by the stage. Stateless stages keep the
/// default [`fit`](Transform::fit), which does nothing.
pub trait Transform<In: ?Sized> {
    /// Batch type produced by [`transform`](Transform::transform)
    type Output;

    /// Learn state from `batch`. The default is a no-op.
    ///
    /// `labels` are accepted for pipeline uniformity and ignored by the
    /// built-in stages.
    ///
    /// # Errors
    ///
    /// Stage specific; the default never fails.
    fn fit(&mut self, batch: &In, labels: Option<&[f64]>) -> Result<&mut Self, TransformError> {
        let _ = (batch, labels);
        Ok(self)
    }

    /// Produce a new batch from `batch`.
    ///
    /// # Errors
    ///
    /// Stage specific: shape mismatches, filter failures, unfitted state.
    fn transform(&self, batch: &In) -> Result<Self::Output, TransformError>;

    /// [`fit`](Transform::fit) followed by [`transform`](Transform::transform)
    /// on the same batch.
    ///
    /// # Errors
    ///
    /// Whatever `fit` or `transform` return.
    fn fit_transform(
        &mut self,
        batch: &In,
        labels: Option<&[f64]>,
    ) -> Result<Self::Output, TransformError> {
        self.fit(batch, labels)?;
        self.transform(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::butter::ButterFilter;
    use super::decimate::Decimator;
    use super::markers::{LabelsMapping, MarkersTransformer};
    use super::*;
    use ndarray::{array, Array1};

    fn records() -> Batch<Array1<f64>> {
        Batch::Records(vec![
            Array1::from_shape_fn(200, |i| (i as f64 * 0.2).sin()),
            Array1::from_shape_fn(90, |i| (i as f64 * 0.05).cos()),
        ])
    }

    #[test]
    fn test_stateless_fit_returns_self_unchanged() {
        let mut filter = ButterFilter::new(250, 4, 1.0, 30.0).unwrap();
        let before = filter.clone();

        let fitted = filter.fit(&records(), Some(&[1.0, 0.0][..])).unwrap();
        assert_eq!(*fitted, before);
    }

    #[test]
    fn test_bandpass_fit_transform_matches_transform() {
        let mut filter = ButterFilter::new(250, 4, 1.0, 30.0).unwrap();
        let expected = filter.transform(&records()).unwrap();
        assert_eq!(filter.fit_transform(&records(), None).unwrap(), expected);
    }

    #[test]
    fn test_decimator_fit_transform_matches_transform() {
        let mut decimator = Decimator::new(3).unwrap();
        let expected = decimator.transform(&records()).unwrap();
        assert_eq!(decimator.fit_transform(&records(), None).unwrap(), expected);
    }

    #[test]
    fn test_markers_fit_transform_matches_transform() {
        let mapping: LabelsMapping<char> = [(1.0, 'a'), (2.0, 'b')].into_iter().collect();
        let mut transformer = MarkersTransformer::new(mapping, 2, 0.0).unwrap();
        let batch = Batch::Single(array![0.0, 1.0, 0.0, 2.0, 2.0]);

        let expected = transformer.transform(&batch).unwrap();
        assert_eq!(transformer.fit_transform(&batch, Some(&[3.0][..])).unwrap(), expected);
        assert_eq!(expected, Batch::Single(vec![(0, 'a'), (1, 'b'), (2, 'b')]));
    }
}
