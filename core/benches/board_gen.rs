use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use sweeper_core::{Board, GameConfig, RandomMineGenerator};

fn board_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("board_gen");
    let tiers = [
        ("classic", GameConfig::CLASSIC),
        ("dense", GameConfig::new_unchecked((20, 20), 300)),
        ("full", GameConfig::new_unchecked((20, 20), 400)),
    ];
    for (name, config) in tiers {
        group.bench_with_input(BenchmarkId::from_parameter(name), &config, |b, &config| {
            let mut seed = 0u64;
            b.iter(|| {
                seed = seed.wrapping_add(1);
                Board::generate(black_box(config), RandomMineGenerator::new(seed))
            });
        });
    }
    group.finish();
}

criterion_group!(benches, board_generation);
criterion_main!(benches);
