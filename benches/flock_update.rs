use boids_sim::{BoidConfig, Flock};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

fn bench_flock_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("flock_update");
    for &num_boids in &[100usize, 250, 500] {
        group.bench_function(BenchmarkId::from_parameter(num_boids), |b| {
            let config = BoidConfig {
                num_boids,
                ..BoidConfig::default()
            };
            let mut flock = Flock::with_config(config, 7).expect("valid config");
            b.iter(|| flock.update());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_flock_update);
criterion_main!(benches);
