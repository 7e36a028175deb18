//! Marker channels to event lists
//!
//! A marker channel holds `empty_label` everywhere except at samples where
//! an event occurred. Each non-empty sample becomes `(index, label)`.

use ndarray::{ArrayBase, Data, Dimension, Ix1};
use serde::{Deserialize, Serialize};

use super::batch::{record_view, Batch};
use super::Transform;
use crate::error::TransformError;

/// Default decimation applied to event indices
pub const DEFAULT_DECIMATION_FACTOR: usize = 1;

/// Default marker value meaning "no event"
pub const DEFAULT_EMPTY_LABEL: f64 = 0.0;

/// Mapping from raw marker values to output labels.
///
/// Marker values are floats, so the mapping is an ordered list of pairs
/// rather than a hash map. When a value occurs more than once the last
/// entry wins.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelsMapping<L> {
    entries: Vec<(f64, L)>,
}

impl<L> LabelsMapping<L> {
    /// Empty mapping
    #[must_use]
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Add a pair; shadows earlier pairs with the same value
    pub fn insert(&mut self, value: f64, label: L) {
        self.entries.push((value, label));
    }

    /// Label for a raw marker value
    #[must_use]
    pub fn get(&self, value: f64) -> Option<&L> {
        self.entries.iter().rev().find(|(key, _)| *key == value).map(|(_, label)| label)
    }

    /// Number of stored pairs, duplicates included
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no pairs are stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<L> Default for LabelsMapping<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L> FromIterator<(f64, L)> for LabelsMapping<L> {
    fn from_iter<I: IntoIterator<Item = (f64, L)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}

/// Converts 1-D marker records into `(sample_index, label)` events
#[derive(Clone, Debug, PartialEq)]
pub struct MarkersTransformer<L> {
    labels_mapping: LabelsMapping<L>,
    decimation_factor: usize,
    empty_label: f64,
}

impl<L> MarkersTransformer<L> {
    /// Create a markers transformer.
    ///
    /// Event indices are floor-divided by `decimation_factor` so they line
    /// up with a signal decimated by the same factor.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::InvalidParameter`] if `decimation_factor`
    /// is zero or `empty_label` is NaN.
    pub fn new(
        labels_mapping: LabelsMapping<L>,
        decimation_factor: usize,
        empty_label: f64,
    ) -> Result<Self, TransformError> {
        if decimation_factor == 0 {
            return Err(TransformError::InvalidParameter {
                parameter: "decimation_factor",
                reason: "must be at least 1".into(),
            });
        }
        if empty_label.is_nan() {
            // NaN never compares equal, so every sample would become an event
            return Err(TransformError::InvalidParameter {
                parameter: "empty_label",
                reason: "must not be NaN".into(),
            });
        }

        Ok(Self { labels_mapping, decimation_factor, empty_label })
    }

    /// Transformer with decimation 1 and empty label 0.0
    #[must_use]
    pub fn from_mapping(labels_mapping: LabelsMapping<L>) -> Self {
        Self {
            labels_mapping,
            decimation_factor: DEFAULT_DECIMATION_FACTOR,
            empty_label: DEFAULT_EMPTY_LABEL,
        }
    }

    /// Raw value to label mapping
    #[must_use]
    pub fn labels_mapping(&self) -> &LabelsMapping<L> {
        &self.labels_mapping
    }

    /// Divisor applied to event indices
    #[must_use]
    pub fn decimation_factor(&self) -> usize {
        self.decimation_factor
    }

    /// Marker value meaning "no event"
    #[must_use]
    pub fn empty_label(&self) -> f64 {
        self.empty_label
    }
}

impl<L: Clone> MarkersTransformer<L> {
    /// Extract events from one marker channel.
    ///
    /// `record` is the record's position in its batch, used for errors.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::UnmappedMarker`] for the first non-empty
    /// value without a label.
    pub fn events<'a, I>(&self, record: usize, markers: I) -> Result<Vec<(usize, L)>, TransformError>
    where
        I: IntoIterator<Item = &'a f64>,
    {
        markers
            .into_iter()
            .enumerate()
            .filter(|&(_, &value)| value != self.empty_label)
            .map(|(index, &value)| {
                let label = self
                    .labels_mapping
                    .get(value)
                    .ok_or(TransformError::UnmappedMarker { record, index, value })?;
                Ok((index / self.decimation_factor, label.clone()))
            })
            .collect()
    }
}

impl<L, S, D> Transform<Batch<ArrayBase<S, D>>> for MarkersTransformer<L>
where
    L: Clone,
    S: Data<Elem = f64>,
    D: Dimension,
{
    type Output = Batch<Vec<(usize, L)>>;

    fn transform(&self, batch: &Batch<ArrayBase<S, D>>) -> Result<Self::Output, TransformError> {
        tracing::trace!(records = batch.len(), "extracting marker events");

        batch.try_map(|i, record| {
            let markers = record_view::<_, _, Ix1>(record, i)?;
            self.events(i, markers.iter())
        })
    }
}
