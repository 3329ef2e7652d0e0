//! Criterion benchmarks for cubik.
#![allow(missing_docs, unused_results)]

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use cubik::animation::{Easing, ManualClock};
use cubik::cube::{Axis, Cube};
use cubik::engine::CubeEngine;
use cubik::geometry::{rounded_box, rounded_plate};
use cubik::moves::Move;
use cubik::options::{CubeOptions, FaceColors, Options};

fn easing_benchmark(c: &mut Criterion) {
    let curves = [
        ("power_out_3", Easing::power_out(3)),
        ("sine_in_out", Easing::SineInOut),
        ("back_out", Easing::back_out(0.3)),
    ];
    for (name, easing) in curves {
        c.bench_function(&format!("easing_{name}"), |b| {
            b.iter(|| black_box(easing.evaluate(black_box(0.37))));
        });
    }
}

fn geometry_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("rounded_box");
    for segments in [1, 3, 8] {
        group.bench_function(format!("{segments}_segments"), |b| {
            b.iter(|| black_box(rounded_box(1.0 / 3.0, 0.12, segments)));
        });
    }
    group.finish();

    c.bench_function("rounded_plate", |b| {
        b.iter(|| black_box(rounded_plate(1.0 / 3.0, 0.15, 0.01)));
    });
}

fn instant_turn_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("instant_turn");
    for size in [3, 7, 17] {
        let options = CubeOptions {
            size,
            ..CubeOptions::default()
        };
        let mut cube = Cube::initialized(&options, FaceColors::default()).unwrap();
        let mv = Move::new(Axis::Y, size / 2, 1);

        group.bench_function(format!("{size}x{size}x{size}"), |b| {
            b.iter(|| cube.apply_move(black_box(mv)).unwrap());
        });
    }
    group.finish();
}

fn animated_frame_benchmark(c: &mut Criterion) {
    c.bench_function("animated_turn_60hz", |b| {
        let clock = ManualClock::new();
        let mut engine =
            CubeEngine::with_clock(Options::default(), clock.clone()).unwrap();
        b.iter(|| {
            engine.request_move(Axis::X, 1, 1, true).unwrap();
            while engine.frame() {
                clock.advance_ms(1000.0 / 60.0);
            }
        });
    });
}

criterion_group!(
    benches,
    easing_benchmark,
    geometry_benchmark,
    instant_turn_benchmark,
    animated_frame_benchmark
);
criterion_main!(benches);
