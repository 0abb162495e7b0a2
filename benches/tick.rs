//! Benchmarks for the diffusion tick.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use thermal_grid::{
    compute::{Cell, DiffusionGrid},
    schema::{Band, GridConfig, MaterialLayout},
};

fn banded_config(size: usize) -> GridConfig {
    GridConfig {
        rows: size,
        cols: size,
        baseline: 5.0,
        source_rate: 10.0,
        material: MaterialLayout::Banded {
            default_mass: 1.0,
            bands: vec![
                Band {
                    margin: size / 8,
                    delta: 100.0,
                },
                Band {
                    margin: size / 8 + 1,
                    delta: -100.0,
                },
            ],
        },
        initial_sources: vec![Cell::new(size / 5, size / 5)],
        initial_sinks: vec![Cell::new(size - 3, size - 3)],
    }
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");

    for size in [40, 128, 256, 512, 1024] {
        let config = banded_config(size);
        let mut grid = DiffusionGrid::new(&config).unwrap();

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", size, size)),
            &size,
            |b, _| {
                b.iter(|| {
                    black_box(&mut grid).tick();
                });
            },
        );
    }

    group.finish();
}

fn bench_many_sources(c: &mut Criterion) {
    let mut group = c.benchmark_group("many_sources");

    for stride in [16, 4, 1] {
        let mut config = banded_config(128);
        config.initial_sources = (0..128)
            .step_by(stride)
            .flat_map(|r| (0..128).step_by(stride).map(move |c| Cell::new(r, c)))
            .collect();
        let mut grid = DiffusionGrid::new(&config).unwrap();

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("stride_{}", stride)),
            &stride,
            |b, _| {
                b.iter(|| {
                    black_box(&mut grid).tick();
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_tick, bench_many_sources);
criterion_main!(benches);
