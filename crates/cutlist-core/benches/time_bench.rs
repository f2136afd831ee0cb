//! Benchmarks for cutlist-core time helpers.
//!
//! Run with: cargo bench -p cutlist-core

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use cutlist_core::{format_seconds, format_timecode, parse_position};

fn bench_format(c: &mut Criterion) {
    c.bench_function("format_seconds", |bencher| {
        bencher.iter(|| format_seconds(black_box(12_345_678_900)));
    });

    c.bench_function("format_timecode_1hr", |bencher| {
        bencher.iter(|| format_timecode(black_box(3_600_000_000_000)));
    });
}

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_position_seconds", |bencher| {
        bencher.iter(|| parse_position(black_box("1.5")));
    });

    c.bench_function("parse_position_clock", |bencher| {
        bencher.iter(|| parse_position(black_box("01:02:03.456")));
    });
}

criterion_group!(benches, bench_format, bench_parse);
criterion_main!(benches);
