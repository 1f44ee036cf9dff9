use chain_core::{
    analyze, annotate, DeterministicRng, Grid, Pace, PaceTable, SplitMix64, TeamId, GRID_COLS,
    GRID_ROWS,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn random_board(seed: u64) -> Grid {
    let mut rng = SplitMix64::new(seed);
    let rows: Vec<String> = (0..GRID_ROWS)
        .map(|_| {
            (0..GRID_COLS)
                .map(|_| match rng.below(5) {
                    0 => '.',
                    k => char::from(b'0' + (k as u8 - 1)),
                })
                .collect()
        })
        .collect();
    let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
    Grid::from_layout(&refs).expect("valid layout")
}

fn bench_analyze(c: &mut Criterion) {
    let grid = random_board(42);
    let table = PaceTable::default();
    let pace = table.config(Pace::Long);

    c.bench_function("chain-core/analyze+annotate(16x20)", |b| {
        b.iter(|| {
            let mut work = analyze(black_box(&grid), TeamId(1));
            annotate(&mut work, pace);
            black_box(work.chains().len());
        })
    });
}

criterion_group!(benches, bench_analyze);
criterion_main!(benches);
