//! Throughput of the per-frame ingest path

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use drowsiness::{DrowsinessEvaluator, Measurement};

fn bench_ingest(c: &mut Criterion) {
    c.bench_function("ingest_open_stream", |b| {
        let mut eval = DrowsinessEvaluator::default();
        eval.reset(0.0);
        let mut t = 0.0;
        b.iter(|| {
            t += 1.0 / 30.0;
            black_box(eval.ingest(Measurement::new(t, 0.05, 0.05)))
        });
    });

    c.bench_function("ingest_blink_stream", |b| {
        let mut eval = DrowsinessEvaluator::default();
        eval.reset(0.0);
        let mut t = 0.0;
        let mut frame = 0u64;
        b.iter(|| {
            t += 1.0 / 30.0;
            frame += 1;
            // a short blink every second keeps both eviction paths busy
            let closedness = if frame % 30 < 4 { 0.95 } else { 0.05 };
            black_box(eval.ingest(Measurement::new(t, closedness, closedness)))
        });
    });
}

criterion_group!(benches, bench_ingest);
criterion_main!(benches);
