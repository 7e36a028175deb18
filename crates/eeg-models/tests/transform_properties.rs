//! Property tests for the preprocessing transforms

use eeg_models::{
    Batch, ButterFilter, ChannelwiseScaler, Decimator, LabelsMapping, MarkersTransformer,
    MinMaxScaler, StandardScaler, Transform,
};
use ndarray::{Array1, Array2};
use proptest::prelude::*;

fn signal(len: impl Into<prop::collection::SizeRange>) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-100.0f64..100.0, len)
}

fn eeg_record() -> impl Strategy<Value = Array2<f64>> {
    (1usize..6, 1usize..50).prop_flat_map(|(channels, samples)| {
        prop::collection::vec(-1e3f64..1e3, channels * samples).prop_map(move |data| {
            Array2::from_shape_vec((channels, samples), data).unwrap()
        })
    })
}

proptest! {
    #[test]
    fn decimated_length_is_ceiling(x in signal(28..500), factor in 1usize..=13) {
        let decimator = Decimator::new(factor).unwrap();
        let n = x.len();

        let out = decimator.transform(&Batch::Single(Array1::from(x))).unwrap();
        let out = out.into_records();
        prop_assert_eq!(out[0].len(), n.div_ceil(factor));
        prop_assert_eq!(out[0].len(), decimator.output_len(n));
    }

    #[test]
    fn bandpass_preserves_lengths(
        records in prop::collection::vec(signal(40..400), 1..5),
        sampling_rate in 100u32..=1000,
        order in 1u32..=6,
        highpass_fraction in 0.05f64..0.3,
        width_fraction in 0.1f64..0.6,
    ) {
        let nyquist = 0.5 * f64::from(sampling_rate);
        let highpass = highpass_fraction * nyquist;
        let lowpass = (highpass_fraction + width_fraction).min(0.95) * nyquist;

        let filter = ButterFilter::new(sampling_rate, order, highpass, lowpass).unwrap();
        prop_assert_eq!(filter.coefficients().num_taps(), 2 * order as usize + 1);
        prop_assert!(filter.min_record_len() <= 40);

        let lens: Vec<usize> = records.iter().map(Vec::len).collect();
        let batch = Batch::Records(records.into_iter().map(Array1::from).collect());

        let out = filter.transform(&batch).unwrap();
        let out_lens: Vec<usize> = out.iter().map(Array1::len).collect();
        prop_assert_eq!(out_lens, lens);
        prop_assert!(out.iter().all(|r| r.iter().all(|v| v.is_finite())));
    }

    #[test]
    fn markers_emit_one_event_per_nonempty_sample(
        values in prop::collection::vec(0u8..3, 0..200),
        factor in 1usize..6,
    ) {
        let mapping: LabelsMapping<u8> = [(1.0, 10), (2.0, 20)].into_iter().collect();
        let transformer = MarkersTransformer::new(mapping, factor, 0.0).unwrap();
        let record: Array1<f64> = values.iter().map(|&v| f64::from(v)).collect();

        let events = transformer.transform(&Batch::Single(record)).unwrap().into_records();
        let expected: Vec<(usize, u8)> = values
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v != 0)
            .map(|(i, &v)| (i / factor, v * 10))
            .collect();
        prop_assert_eq!(&events[0], &expected);
    }

    #[test]
    fn min_max_scaling_keeps_shape_and_bounds(records in prop::collection::vec(eeg_record(), 1..4)) {
        let channels = records[0].nrows();
        let records: Vec<Array2<f64>> = records
            .into_iter()
            .filter(|r| r.nrows() == channels)
            .collect();
        let dims: Vec<(usize, usize)> = records.iter().map(Array2::dim).collect();
        let batch = Batch::Records(records);

        let mut scaler = ChannelwiseScaler::new(MinMaxScaler::new());
        let out = scaler.fit_transform(&batch, None).unwrap();

        let out_dims: Vec<(usize, usize)> = out.iter().map(Array2::dim).collect();
        prop_assert_eq!(out_dims, dims);
        for record in &out {
            prop_assert!(record.iter().all(|&v| (-1e-9..=1.0 + 1e-9).contains(&v)));
        }
    }

    #[test]
    fn split_fits_match_single_fit(first in eeg_record(), extra in 1usize..40) {
        let channels = first.nrows();
        let second = Array2::from_shape_fn((channels, extra), |(c, t)| (c * 7 + t) as f64 * 0.5);
        let both = Batch::Records(vec![first.clone(), second.clone()]);

        let mut split = ChannelwiseScaler::new(StandardScaler::new());
        split.fit(&Batch::Single(first), None).unwrap();
        split.fit(&Batch::Single(second), None).unwrap();

        let mut single = ChannelwiseScaler::new(StandardScaler::new());
        single.fit(&both, None).unwrap();

        let (a, b) = (split.scaler().mean().unwrap(), single.scaler().mean().unwrap());
        for c in 0..channels {
            prop_assert!((a[c] - b[c]).abs() < 1e-9 * b[c].abs().max(1.0));
        }
        let (va, vb) = (split.scaler().variance().unwrap(), single.scaler().variance().unwrap());
        for c in 0..channels {
            prop_assert!((va[c] - vb[c]).abs() < 1e-7 * vb[c].max(1.0));
        }
    }
}
