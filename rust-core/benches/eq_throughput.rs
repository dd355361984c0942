use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use three_band_eq::audio::InterleavedDriver;
use three_band_eq::{AudioEffectCore, EqConfig, GainConfiguration, ThreeBandEq};

fn test_signal(len: usize) -> Vec<f32> {
    (0..len)
        .map(|n| (n as f32 * 0.013).sin() * 0.5 + (n as f32 * 0.71).sin() * 0.25)
        .collect()
}

fn bench_stereo_blocks(c: &mut Criterion) {
    let mut group = c.benchmark_group("stereo_block");
    let config = EqConfig::with_gains(GainConfiguration::new(3.0, -2.0, 6.0));

    for &block in &[64usize, 512, 4096] {
        let left = test_signal(block);
        let right = test_signal(block);
        let mut out_left = vec![0.0; block];
        let mut out_right = vec![0.0; block];
        let mut eq = ThreeBandEq::new(config);

        group.throughput(Throughput::Elements((block * 2) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(block), &block, |b, &n| {
            b.iter(|| {
                eq.process(
                    black_box(&[&left[..], &right[..]]),
                    &mut [&mut out_left[..], &mut out_right[..]],
                    n,
                );
            })
        });
    }

    group.finish();
}

fn bench_interleaved_driver(c: &mut Criterion) {
    let input = test_signal(2 * 4096);
    let mut output = vec![0.0; input.len()];
    let mut eq = ThreeBandEq::default();
    let mut driver = InterleavedDriver::new(2, 512);

    c.bench_function("interleaved_4096_frames", |b| {
        b.iter(|| driver.process(&mut eq, black_box(&input), &mut output))
    });
}

criterion_group!(benches, bench_stereo_blocks, bench_interleaved_driver);
criterion_main!(benches);
