//! Incremental feature scalers
//!
//! Scalers operate on matrices shaped (samples × features) and accumulate
//! statistics across `partial_fit` calls, so a dataset can be fitted one
//! batch at a time.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis, Zip};

use crate::error::ScalerError;

/// Scales below this are treated as zero and replaced by 1.
const ZERO_SCALE_EPS: f64 = 10.0 * f64::EPSILON;

/// Scaler that can be fitted incrementally.
pub trait IncrementalScaler {
    /// Update accumulated statistics with `data` (samples × features).
    ///
    /// # Errors
    ///
    /// Returns [`ScalerError::FeatureMismatch`] if the feature count
    /// differs from earlier calls.
    fn partial_fit(&mut self, data: ArrayView2<'_, f64>) -> Result<(), ScalerError>;

    /// Scale `data` (samples × features) with the accumulated statistics.
    ///
    /// # Errors
    ///
    /// Returns [`ScalerError::NotFitted`] before the first `partial_fit`,
    /// or [`ScalerError::FeatureMismatch`].
    fn transform(&self, data: ArrayView2<'_, f64>) -> Result<Array2<f64>, ScalerError>;
}

impl<T: IncrementalScaler + ?Sized> IncrementalScaler for Box<T> {
    fn partial_fit(&mut self, data: ArrayView2<'_, f64>) -> Result<(), ScalerError> {
        (**self).partial_fit(data)
    }

    fn transform(&self, data: ArrayView2<'_, f64>) -> Result<Array2<f64>, ScalerError> {
        (**self).transform(data)
    }
}

fn check_features(expected: usize, data: &ArrayView2<'_, f64>) -> Result<(), ScalerError> {
    let got = data.ncols();
    if got == expected {
        Ok(())
    } else {
        Err(ScalerError::FeatureMismatch { expected, got })
    }
}

fn handle_zero_scale(scale: f64) -> f64 {
    if scale.abs() < ZERO_SCALE_EPS {
        1.0
    } else {
        scale
    }
}

// ============================================================================
// Standard Scaler
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
struct Moments {
    n_samples: usize,
    /// Non-NaN values seen per feature
    counts: Array1<usize>,
    mean: Array1<f64>,
    /// Sum of squared deviations from the mean
    m2: Array1<f64>,
}

impl Moments {
    fn empty(features: usize) -> Self {
        Self {
            n_samples: 0,
            counts: Array1::zeros(features),
            mean: Array1::zeros(features),
            m2: Array1::zeros(features),
        }
    }

    fn variance(&self) -> Array1<f64> {
        Zip::from(&self.m2)
            .and(&self.counts)
            .map_collect(|&m2, &n| if n > 0 { m2 / n as f64 } else { 0.0 })
    }
}

/// Count, mean and sum of squared deviations of the non-NaN values.
fn column_moments(column: ArrayView1<'_, f64>) -> (usize, f64, f64) {
    let (n, sum) = column
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0usize, 0.0), |(n, sum), &v| (n + 1, sum + v));
    if n == 0 {
        return (0, 0.0, 0.0);
    }

    let mean = sum / n as f64;
    let m2 = column
        .iter()
        .filter(|v| !v.is_nan())
        .map(|&v| (v - mean) * (v - mean))
        .sum();
    (n, mean, m2)
}

/// Removes the mean and scales to unit variance per feature.
///
/// Running statistics are merged pairwise, so fitting two batches in
/// sequence gives the same mean and (population) variance as fitting their
/// concatenation. NaN values are ignored while fitting and stay NaN when
/// transformed.
#[derive(Clone, Debug, PartialEq)]
pub struct StandardScaler {
    with_mean: bool,
    with_std: bool,
    moments: Option<Moments>,
}

impl StandardScaler {
    /// Centre and scale
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(true, true)
    }

    /// Choose whether to centre and/or scale
    #[must_use]
    pub fn with_options(with_mean: bool, with_std: bool) -> Self {
        Self { with_mean, with_std, moments: None }
    }

    /// Samples seen across all `partial_fit` calls
    #[must_use]
    pub fn n_samples_seen(&self) -> usize {
        self.moments.as_ref().map_or(0, |m| m.n_samples)
    }

    /// Per-feature mean, if fitted
    #[must_use]
    pub fn mean(&self) -> Option<&Array1<f64>> {
        self.moments.as_ref().map(|m| &m.mean)
    }

    /// Per-feature population variance, if fitted
    #[must_use]
    pub fn variance(&self) -> Option<Array1<f64>> {
        self.moments.as_ref().map(Moments::variance)
    }

    /// Non-NaN values seen per feature, if fitted
    #[must_use]
    pub fn n_values_seen(&self) -> Option<&Array1<usize>> {
        self.moments.as_ref().map(|m| &m.counts)
    }

    /// Drop all accumulated statistics
    pub fn reset(&mut self) {
        self.moments = None;
    }
}

impl Default for StandardScaler {
    fn default() -> Self {
        Self::new()
    }
}

impl IncrementalScaler for StandardScaler {
    fn partial_fit(&mut self, data: ArrayView2<'_, f64>) -> Result<(), ScalerError> {
        if let Some(moments) = &self.moments {
            check_features(moments.mean.len(), &data)?;
        }
        if data.nrows() == 0 {
            return Ok(());
        }

        let mut moments = self.moments.take().unwrap_or_else(|| Moments::empty(data.ncols()));
        for (j, column) in data.columns().into_iter().enumerate() {
            let (n_new, new_mean, new_m2) = column_moments(column);
            if n_new == 0 {
                continue;
            }

            let n_old = moments.counts[j] as f64;
            let n_b = n_new as f64;
            let total = n_old + n_b;
            let delta = new_mean - moments.mean[j];

            moments.mean[j] += delta * n_b / total;
            moments.m2[j] += new_m2 + delta * delta * n_old * n_b / total;
            moments.counts[j] += n_new;
        }
        moments.n_samples += data.nrows();
        self.moments = Some(moments);

        Ok(())
    }

    fn transform(&self, data: ArrayView2<'_, f64>) -> Result<Array2<f64>, ScalerError> {
        let moments = self
            .moments
            .as_ref()
            .ok_or(ScalerError::NotFitted { scaler: "StandardScaler" })?;
        check_features(moments.mean.len(), &data)?;

        let shift = if self.with_mean { moments.mean.clone() } else { Array1::zeros(moments.mean.len()) };
        let scale = if self.with_std {
            moments.variance().mapv(|var| handle_zero_scale(var.sqrt()))
        } else {
            Array1::ones(moments.mean.len())
        };

        Ok((&data - &shift) / &scale)
    }
}

// ============================================================================
// Min-Max Scaler
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
struct Extrema {
    n_samples: usize,
    data_min: Array1<f64>,
    data_max: Array1<f64>,
}

/// Maps each feature linearly onto `feature_range` using the running
/// minimum and maximum. NaN inputs are ignored while fitting.
#[derive(Clone, Debug, PartialEq)]
pub struct MinMaxScaler {
    feature_range: (f64, f64),
    extrema: Option<Extrema>,
}

impl MinMaxScaler {
    /// Scale into `[0, 1]`
    #[must_use]
    pub fn new() -> Self {
        Self { feature_range: (0.0, 1.0), extrema: None }
    }

    /// Scale into `[min, max]`.
    ///
    /// # Errors
    ///
    /// Returns [`ScalerError::InvalidFeatureRange`] unless `min < max`.
    pub fn with_range(min: f64, max: f64) -> Result<Self, ScalerError> {
        if !(min < max) {
            return Err(ScalerError::InvalidFeatureRange { min, max });
        }
        Ok(Self { feature_range: (min, max), extrema: None })
    }

    /// Target range
    #[must_use]
    pub fn feature_range(&self) -> (f64, f64) {
        self.feature_range
    }

    /// Samples seen across all `partial_fit` calls
    #[must_use]
    pub fn n_samples_seen(&self) -> usize {
        self.extrema.as_ref().map_or(0, |e| e.n_samples)
    }

    /// Per-feature minimum, if fitted
    #[must_use]
    pub fn data_min(&self) -> Option<&Array1<f64>> {
        self.extrema.as_ref().map(|e| &e.data_min)
    }

    /// Per-feature maximum, if fitted
    #[must_use]
    pub fn data_max(&self) -> Option<&Array1<f64>> {
        self.extrema.as_ref().map(|e| &e.data_max)
    }

    /// Drop all accumulated statistics
    pub fn reset(&mut self) {
        self.extrema = None;
    }
}

impl Default for MinMaxScaler {
    fn default() -> Self {
        Self::new()
    }
}

impl IncrementalScaler for MinMaxScaler {
    fn partial_fit(&mut self, data: ArrayView2<'_, f64>) -> Result<(), ScalerError> {
        if let Some(extrema) = &self.extrema {
            check_features(extrema.data_min.len(), &data)?;
        }
        if data.nrows() == 0 {
            return Ok(());
        }

        // f64::min / f64::max skip NaN operands
        let batch_min = data.fold_axis(Axis(0), f64::INFINITY, |&acc, &x| acc.min(x));
        let batch_max = data.fold_axis(Axis(0), f64::NEG_INFINITY, |&acc, &x| acc.max(x));

        self.extrema = Some(match self.extrema.take() {
            None => Extrema { n_samples: data.nrows(), data_min: batch_min, data_max: batch_max },
            Some(old) => Extrema {
                n_samples: old.n_samples + data.nrows(),
                data_min: Zip::from(&old.data_min).and(&batch_min).map_collect(|&a, &b| a.min(b)),
                data_max: Zip::from(&old.data_max).and(&batch_max).map_collect(|&a, &b| a.max(b)),
            },
        });

        Ok(())
    }

    fn transform(&self, data: ArrayView2<'_, f64>) -> Result<Array2<f64>, ScalerError> {
        let extrema = self
            .extrema
            .as_ref()
            .ok_or(ScalerError::NotFitted { scaler: "MinMaxScaler" })?;
        check_features(extrema.data_min.len(), &data)?;

        let (lo, hi) = self.feature_range;
        let scale = Zip::from(&extrema.data_min)
            .and(&extrema.data_max)
            .map_collect(|&min, &max| (hi - lo) / handle_zero_scale(max - min));
        let offset = Zip::from(&extrema.data_min)
            .and(&scale)
            .map_collect(|&min, &s| lo - min * s);

        Ok(&data * &scale + &offset)
    }
}
