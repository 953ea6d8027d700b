#[macro_use]
extern crate criterion;
extern crate dancing_links;
use criterion::{BatchSize, BenchmarkId, Criterion};
use dancing_links::{Problem, Sudoku};

const README_SUDOKU: &str = "...2...633....54.1..1..398........9....538....3........263..5..5.37....847...1...";
const HARD_SUDOKU: &str = "8..........36......7..9.2...5...7.......457.....1...3...1....68..85...1..9....4..";

fn generated_problems(c: &mut Criterion) {
    let mut group = c.benchmark_group("generated");
    for &universe_size in &[50, 200, 1000] {
        let problem = Problem::generate_seeded(universe_size, universe_size / 2, 0xbe4c);
        group.bench_with_input(
            BenchmarkId::from_parameter(universe_size),
            &problem,
            |b, problem| {
                b.iter_batched(
                    || problem.matrix().unwrap(),
                    |matrix| matrix.solve(),
                    BatchSize::SmallInput,
                )
            },
        );
    }
    group.finish();
}

fn matrix_construction(c: &mut Criterion) {
    let problem = Problem::generate_seeded(1000, 1000, 0xbe4c);
    c.bench_function("matrix_construction", |b| b.iter(|| problem.matrix().unwrap()));
}

fn sudoku_readme(c: &mut Criterion) {
    let sudoku = Sudoku::from_str_line(README_SUDOKU).unwrap();
    c.bench_function("sudoku_readme", |b| b.iter(|| sudoku.solve_one()));
}

fn sudoku_hard(c: &mut Criterion) {
    let sudoku = Sudoku::from_str_line(HARD_SUDOKU).unwrap();
    c.bench_function("sudoku_hard", |b| b.iter(|| sudoku.solve_one()));
}

fn sudoku_empty(c: &mut Criterion) {
    let sudoku = Sudoku::from_bytes([0; 81]).unwrap();
    c.bench_function("sudoku_empty", |b| b.iter(|| sudoku.solve_one()));
}

criterion_group!(
    benches,
    generated_problems,
    matrix_construction,
    sudoku_readme,
    sudoku_hard,
    sudoku_empty,
);
criterion_main!(benches);
