use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use sweeper_core::{Board, FixedMineGenerator, GameConfig, RevealEngine};

fn flood_fill(c: &mut Criterion) {
    // no mines: a single click opens the whole 255x255 board
    let open = Board::generate(
        GameConfig::new_unchecked((255, 255), 0),
        FixedMineGenerator::new(&[]),
    )
    .expect("valid layout");

    c.bench_function("flood_fill_open_board", |b| {
        b.iter_batched(
            || open.clone(),
            |mut board| RevealEngine::new(&mut board).reveal_blank_region(black_box((0, 0))),
            BatchSize::LargeInput,
        )
    });

    // vertical mine walls with gaps at alternating ends make the fill snake through corridors
    let walls: Vec<_> = (0..255u8)
        .step_by(4)
        .flat_map(|x| (0..250u8).map(move |y| (x, if x % 8 == 0 { y } else { y + 5 })))
        .collect();
    let config = GameConfig::new_unchecked((255, 255), walls.len() as u16);
    let walled = Board::generate(config, FixedMineGenerator::new(&walls)).expect("valid layout");

    c.bench_function("flood_fill_corridors", |b| {
        b.iter_batched(
            || walled.clone(),
            |mut board| RevealEngine::new(&mut board).reveal_blank_region(black_box((2, 0))),
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, flood_fill);
criterion_main!(benches);
