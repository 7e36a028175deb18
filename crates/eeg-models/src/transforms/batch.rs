//! Batches of records
//!
//! A batch is either one record or an ordered sequence of records. The
//! variant is resolved once per transform call and mirrored in the output.

use ndarray::{Array, ArrayBase, ArrayView, Data, Dimension, RemoveAxis};

use crate::error::TransformError;

/// One record or many independently shaped records.
#[derive(Clone, Debug, PartialEq)]
pub enum Batch<R> {
    /// A single record (e.g. one EEG shaped channels × samples)
    Single(R),
    /// A sequence of records; lengths may differ between records
    Records(Vec<R>),
}

impl<R> Batch<R> {
    /// Number of records
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// True for an empty `Records` batch
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// Records as a slice (one element for `Single`)
    #[must_use]
    pub fn as_slice(&self) -> &[R] {
        match self {
            Self::Single(record) => std::slice::from_ref(record),
            Self::Records(records) => records,
        }
    }

    /// Iterate over the records in order
    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.as_slice().iter()
    }

    /// Consume into a vector of records
    #[must_use]
    pub fn into_records(self) -> Vec<R> {
        match self {
            Self::Single(record) => vec![record],
            Self::Records(records) => records,
        }
    }

    /// Map every record, keeping the batch variant.
    ///
    /// `f` receives the record's position in the batch. The first error
    /// aborts the whole call.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `f`.
    pub fn try_map<U, E, F>(&self, mut f: F) -> Result<Batch<U>, E>
    where
        F: FnMut(usize, &R) -> Result<U, E>,
    {
        match self {
            Self::Single(record) => f(0, record).map(Batch::Single),
            Self::Records(records) => records
                .iter()
                .enumerate()
                .map(|(i, record)| f(i, record))
                .collect::<Result<Vec<_>, _>>()
                .map(Batch::Records),
        }
    }
}

impl<A: Clone, D: Dimension> Batch<Array<A, D>> {
    /// Split a stacked array along its first axis into a `Records` batch.
    ///
    /// `(n_records, n_channels, n_samples)` becomes `n_records` matrices
    /// shaped `(n_channels, n_samples)`.
    pub fn from_stacked<S, E>(stacked: &ArrayBase<S, E>) -> Self
    where
        S: Data<Elem = A>,
        E: RemoveAxis<Smaller = D>,
    {
        Self::Records(stacked.outer_iter().map(|record| record.to_owned()).collect())
    }
}

impl<R> From<Vec<R>> for Batch<R> {
    fn from(records: Vec<R>) -> Self {
        Self::Records(records)
    }
}

impl<'a, R> IntoIterator for &'a Batch<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// View `record` with the fixed dimensionality `E`.
///
/// # Errors
///
/// Returns [`TransformError::ShapeMismatch`] if the record has a different
/// number of axes.
pub(crate) fn record_view<S, D, E>(
    record: &ArrayBase<S, D>,
    index: usize,
) -> Result<ArrayView<'_, f64, E>, TransformError>
where
    S: Data<Elem = f64>,
    D: Dimension,
    E: Dimension,
{
    record.view().into_dimensionality::<E>().map_err(|_| TransformError::ShapeMismatch {
        record: index,
        expected: E::NDIM.unwrap_or(0),
        got: record.ndim(),
    })
}
