use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use verteiler::convert::kernels::KERNELS;
use verteiler::nodes::{Redistributor, SamplePlayer, Sine};
use verteiler::{AudioConfig, AudioNode, RedistributionMatrix};

const FRAMES: usize = 512;

fn looping_clip(channels: usize) -> Arc<SamplePlayer> {
    let samples = (0..48_000 * channels).map(|i| (i as f32 * 0.001).sin()).collect();
    Arc::new(SamplePlayer::new(samples, channels, 48_000).with_looping(true))
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let config = AudioConfig::default();

    c.bench_function("Sine.read()", |b| {
        let source = Sine::new(480.0, 48_000);
        let mut output = vec![0.0; FRAMES];

        b.iter(|| source.read(black_box(&mut output), FRAMES))
    });

    for (src, dst) in [(6, 2), (2, 6), (8, 2), (1, 8)] {
        c.bench_function(&format!("Redistributor.read() {src}->{dst}"), |b| {
            let node = Redistributor::new(dst, &config).expect("redistributor");
            node.attach(looping_clip(src)).expect("named layout");
            let mut output = vec![0.0; FRAMES * dst];

            b.iter(|| node.read(black_box(&mut output), FRAMES))
        });
    }

    c.bench_function("Redistributor.read() 6->2 matrix", |b| {
        let node = Redistributor::new(2, &config).expect("redistributor");
        let matrix = RedistributionMatrix::for_layouts(6, 2).expect("5.1->stereo");
        node.attach_with_matrix(looping_clip(6), matrix.coefficients())
            .expect("matrix");
        let mut output = vec![0.0; FRAMES * 2];

        b.iter(|| node.read(black_box(&mut output), FRAMES))
    });

    let mut group = c.benchmark_group("Kernel.run_in_place()");
    for kernel in KERNELS {
        let mut buffer = vec![0.25; FRAMES * kernel.src().max(kernel.dst())];
        group.bench_function(kernel.name(), |b| {
            b.iter(|| kernel.run_in_place(black_box(&mut buffer), FRAMES))
        });
    }
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
