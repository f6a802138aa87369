//! Generation and rendering benchmarks.
//!
//! A batch must be produced well inside one tick of the event loop for the
//! window to keep ahead of scrolling, and a frame must render without lag.
//!
//! Run with: cargo bench --bench generation_benchmark

#![allow(missing_docs)] // criterion macros generate undocumented items

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use numgrid::model::{factorize, is_prime};
use numgrid::source::generator::generate;
use numgrid::source::{Direction, GenerationRequest};
use numgrid::state::{AppState, WindowConfig};
use numgrid::view::{ColorConfig, TuiApp};
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use std::time::Duration;

/// Magnitudes at which per-number cost is measured.
const MAGNITUDES: [u64; 4] = [1_000, 1_000_000, 1_000_000_000, 1_000_000_000_000];

/// Benchmark one default-sized batch (100 rows x 10 columns) at each magnitude.
fn benchmark_generate_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_batch");
    group.sample_size(20);

    for start in MAGNITUDES {
        group.bench_with_input(BenchmarkId::new("ascending", start), &start, |b, &start| {
            b.iter(|| generate(GenerationRequest::new(black_box(start), 1000, Direction::Ascending)));
        });
        group.bench_with_input(BenchmarkId::new("descending", start), &start, |b, &start| {
            b.iter(|| generate(GenerationRequest::new(black_box(start), 1000, Direction::Descending)));
        });
    }

    group.finish();
}

/// Benchmark the per-number arithmetic.
fn benchmark_number_theory(c: &mut Criterion) {
    let mut group = c.benchmark_group("number_theory");

    for n in MAGNITUDES {
        // Odd neighbour, so the trial division loop actually runs.
        let n = n + 1;
        group.bench_with_input(BenchmarkId::new("is_prime", n), &n, |b, &n| {
            b.iter(|| is_prime(black_box(n)));
        });
        group.bench_with_input(BenchmarkId::new("factorize", n), &n, |b, &n| {
            b.iter(|| factorize(black_box(n)));
        });
    }

    group.finish();
}

/// Benchmark drawing a full frame of the loaded grid.
fn benchmark_render(c: &mut Criterion) {
    let mut state = AppState::new(WindowConfig::default());
    state.pump_timeout(Duration::from_secs(5));

    let terminal = Terminal::new(TestBackend::new(120, 50)).expect("test terminal");
    let mut app = TuiApp::with_terminal(terminal, state, ColorConfig::from_env_and_args(false));

    c.bench_function("render_frame", |b| {
        b.iter(|| app.draw().expect("draw"));
    });
}

criterion_group!(
    benches,
    benchmark_generate_batch,
    benchmark_number_theory,
    benchmark_render
);
criterion_main!(benches);
