use criterion::{criterion_group, criterion_main, Criterion};
use invensync_core::SimConfig;
use invensync_runtime::{Cadence, WarehouseEngine};

fn bench_ticks(c: &mut Criterion) {
    let mut engine = match WarehouseEngine::new(SimConfig::default()) {
        Ok(e) => e,
        Err(e) => panic!("default config rejected: {e}"),
    };
    engine.start();
    c.bench_function("advance_one_minute", |b| {
        b.iter(|| engine.advance(60_000))
    });
    c.bench_function("movement_tick", |b| {
        b.iter(|| engine.run_cadence(Cadence::Movement))
    });
    c.bench_function("snapshot", |b| b.iter(|| engine.snapshot()));
    engine.stop();
}

criterion_group!(benches, bench_ticks);
criterion_main!(benches);
