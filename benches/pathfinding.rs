//! A* benchmarks over open and maze-like grids.
//!
//! Run with: cargo bench --bench pathfinding

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tbg_ai::{find_path, GridPos, Tile, TileGrid, DEFAULT_EXPANSION_BUDGET};

/// Vertical walls every fourth column, alternating a gap at the top and bottom.
fn maze(size: usize) -> TileGrid {
    let mut grid = TileGrid::new(size, size);
    let last = size as i32 - 1;
    for x in (2..last).step_by(4) {
        let gap = if (x / 4) % 2 == 0 { last } else { 0 };
        for y in 0..=last {
            if y != gap {
                grid.set(GridPos::new(x, y), Tile::Wall);
            }
        }
    }
    grid
}

fn bench_open_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("astar_open");

    for size in [16usize, 32, 64] {
        let grid = TileGrid::new(size, size);
        let goal = GridPos::new(size as i32 - 1, size as i32 - 1);

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let path = find_path(GridPos::new(0, 0), black_box(goal), &grid, usize::MAX);
                black_box(path)
            });
        });
    }

    group.finish();
}

fn bench_maze(c: &mut Criterion) {
    let mut group = c.benchmark_group("astar_maze");

    for size in [16usize, 32] {
        let grid = maze(size);
        let goal = GridPos::new(size as i32 - 1, 0);

        group.bench_with_input(BenchmarkId::new("unbounded", size), &size, |b, _| {
            b.iter(|| black_box(find_path(GridPos::new(0, 0), black_box(goal), &grid, usize::MAX)));
        });
        group.bench_with_input(BenchmarkId::new("budgeted", size), &size, |b, _| {
            b.iter(|| {
                black_box(find_path(
                    GridPos::new(0, 0),
                    black_box(goal),
                    &grid,
                    DEFAULT_EXPANSION_BUDGET,
                ))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_open_grid, bench_maze);
criterion_main!(benches);
