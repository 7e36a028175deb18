//! Benchmarks for the preprocessing transforms

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::{Array1, Array2};

use eeg_models::{
    Batch, ButterFilter, ChannelwiseScaler, Decimator, LabelsMapping, MarkersTransformer,
    StandardScaler, Transform,
};
use eeg_models_core::design::butter_bandpass;

/// Generate synthetic EEG data (sinusoidal with noise)
fn generate_eeg_samples(n: usize, freq_hz: f64, sample_rate: f64) -> Array1<f64> {
    use std::f64::consts::PI;

    Array1::from_shape_fn(n, |i| {
        let t = i as f64 / sample_rate;
        let signal = (2.0 * PI * freq_hz * t).sin();
        let noise = (i as f64 * 0.123).sin() * 0.1; // Pseudo-noise
        (signal + noise) * 50.0 // Scale to ~50 µV
    })
}

fn generate_eeg_record(channels: usize, n: usize) -> Array2<f64> {
    let mut record = Array2::zeros((channels, n));
    for (c, mut row) in record.rows_mut().into_iter().enumerate() {
        row.assign(&generate_eeg_samples(n, 8.0 + c as f64, 250.0));
    }
    record
}

fn bench_filter_design(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_design");

    for order in [2u32, 4, 8].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(order), order, |b, &order| {
            b.iter(|| black_box(butter_bandpass(order, black_box(0.004), black_box(0.32))));
        });
    }

    group.finish();
}

fn bench_butter_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("butter_filter");

    let filter = ButterFilter::new(250, 4, 0.5, 40.0).unwrap();

    for size in [256, 1024, 4096].iter() {
        let batch = Batch::Single(generate_eeg_samples(*size, 10.0, 250.0));

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(filter.transform(black_box(&batch)).unwrap()));
        });
    }

    group.finish();
}

fn bench_decimator(c: &mut Criterion) {
    let mut group = c.benchmark_group("decimator");

    let batch = Batch::Single(generate_eeg_samples(4096, 10.0, 1000.0));

    for factor in [2usize, 4, 8].iter() {
        let decimator = Decimator::new(*factor).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(factor), factor, |b, _| {
            b.iter(|| black_box(decimator.transform(black_box(&batch)).unwrap()));
        });
    }

    group.finish();
}

fn bench_channelwise_scaler(c: &mut Criterion) {
    let mut group = c.benchmark_group("channelwise_scaler");

    for channels in [8usize, 32, 64].iter() {
        let batch = Batch::Records(vec![generate_eeg_record(*channels, 1000); 4]);
        let mut scaler = ChannelwiseScaler::new(StandardScaler::new());
        scaler.fit(&batch, None).unwrap();

        group.bench_with_input(BenchmarkId::new("fit", channels), channels, |b, _| {
            b.iter(|| {
                let mut fresh = ChannelwiseScaler::new(StandardScaler::new());
                fresh.fit(black_box(&batch), None).unwrap();
                black_box(fresh)
            });
        });

        group.bench_with_input(BenchmarkId::new("transform", channels), channels, |b, _| {
            b.iter(|| black_box(scaler.transform(black_box(&batch)).unwrap()));
        });
    }

    group.finish();
}

fn bench_markers(c: &mut Criterion) {
    let mut group = c.benchmark_group("markers");

    let mapping: LabelsMapping<u32> = [(1.0, 1), (2.0, 2), (3.0, 3)].into_iter().collect();
    let transformer = MarkersTransformer::new(mapping, 4, 0.0).unwrap();
    let markers = Array1::from_shape_fn(10_000, |i| if i % 250 == 0 { (i / 250 % 3 + 1) as f64 } else { 0.0 });
    let batch = Batch::Single(markers);

    group.bench_function("events_10k", |b| {
        b.iter(|| black_box(transformer.transform(black_box(&batch)).unwrap()));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_filter_design,
    bench_butter_filter,
    bench_decimator,
    bench_channelwise_scaler,
    bench_markers,
);

criterion_main!(benches);
