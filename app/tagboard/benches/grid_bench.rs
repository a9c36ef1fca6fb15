//! Benchmarks for the grid fitter and relayout.
//!
//! Run with: `cargo bench -p tagboard`
//!
//! ## Benchmark Groups
//!
//! - `fit`: best-fit search at various tile counts
//! - `fit_fallback`: containers where no candidate fits
//! - `relayout`: full query, fit and apply cycle on a CSS surface
//! - `gap`: computed-style gap parsing

use std::hint::black_box;
use std::num::NonZeroUsize;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use tagboard_lib::cli::CssSurface;
use tagboard_lib::constants::DEFAULT_ASPECT_RATIO;
use tagboard_lib::grid::{LayoutRequest, fit, parse_gap, relayout};

// ============================================================================
// Test Data
// ============================================================================

/// A 1080p board container.
fn board_request(count: usize) -> LayoutRequest {
    let count = NonZeroUsize::new(count).unwrap_or(NonZeroUsize::MIN);
    LayoutRequest::new(count, 1888.0, 940.0, 8.0, DEFAULT_ASPECT_RATIO)
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("fit");

    for count in [1, 10, 40, 250, 5000] {
        let request = board_request(count);
        group.bench_with_input(BenchmarkId::new("board_1080p", count), &request, |b, req| {
            b.iter(|| fit(black_box(req)));
        });
    }

    group.finish();
}

fn bench_fit_fallback(c: &mut Criterion) {
    let mut group = c.benchmark_group("fit_fallback");

    for count in [40, 1000] {
        let count = NonZeroUsize::new(count).unwrap_or(NonZeroUsize::MIN);
        let request = LayoutRequest::new(count, 64.0, 64.0, 16.0, DEFAULT_ASPECT_RATIO);
        group.bench_with_input(BenchmarkId::new("tiny_container", count), &request, |b, req| {
            b.iter(|| fit(black_box(req)));
        });
    }

    group.finish();
}

fn bench_relayout(c: &mut Criterion) {
    let mut group = c.benchmark_group("relayout");

    for count in [12, 120] {
        group.bench_with_input(BenchmarkId::new("css_surface", count), &count, |b, &count| {
            b.iter(|| {
                let mut surface = CssSurface::new(1888.0, 940.0, "8px", count);
                relayout(black_box(&mut surface), black_box(DEFAULT_ASPECT_RATIO))
            });
        });
    }

    group.finish();
}

fn bench_gap(c: &mut Criterion) {
    let mut group = c.benchmark_group("gap");

    for style in ["10px", "4.5px 8px", "normal", "0px"] {
        group.bench_with_input(BenchmarkId::new("parse", style), style, |b, style| {
            b.iter(|| parse_gap(black_box(style)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_fit, bench_fit_fallback, bench_relayout, bench_gap);
criterion_main!(benches);
