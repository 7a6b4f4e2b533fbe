//! Dispatch benchmarks using criterion.
//!
//! Compares a composed visitor and a runtime-checked table against a
//! hand-written `match` over the same variant.
//!
//! Run with: cargo bench --bench dispatch_bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use inline_visit::{inline_visitor, variant, DispatchTable, Handler};

#[derive(Debug, Clone, Copy)]
pub struct Circle(f64);

#[derive(Debug, Clone, Copy)]
pub struct Square(f64);

#[derive(Debug, Clone, Copy)]
pub struct Rect(f64, f64);

variant! {
    #[derive(Debug, Clone, Copy)]
    pub enum Shape {
        Circle(Circle),
        Square(Square),
        Rect(Rect),
    }
}

fn shapes() -> Vec<Shape> {
    (0..1024i32)
        .map(|i| {
            let x = f64::from(i);
            match i % 3 {
                0 => Shape::from(Circle(x)),
                1 => Shape::from(Square(x)),
                _ => Shape::from(Rect(x, x + 1.0)),
            }
        })
        .collect()
}

fn area_match(shape: Shape) -> f64 {
    match shape {
        Shape::Circle(Circle(r)) => r * r * std::f64::consts::PI,
        Shape::Square(Square(s)) => s * s,
        Shape::Rect(Rect(w, h)) => w * h,
    }
}

/// Benchmark one pass over a mixed batch of shapes
fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    let batch = shapes();

    group.bench_function("match", |b| {
        b.iter(|| {
            let total: f64 = batch.iter().map(|s| area_match(*s)).sum();
            black_box(total)
        });
    });

    let visitor = inline_visitor!(f64;
        |Circle(r): Circle| r * r * std::f64::consts::PI,
        |Square(s): Square| s * s,
        |Rect(w, h): Rect| w * h,
    );
    group.bench_function("visitor", |b| {
        b.iter(|| {
            let total: f64 = batch.iter().map(|s| visitor.apply(*s)).sum();
            black_box(total)
        });
    });

    let table = DispatchTable::<Shape, f64>::compose(vec![
        Handler::new(|Circle(r): Circle| r * r * std::f64::consts::PI),
        Handler::new(|Square(s): Square| s * s),
        Handler::new(|Rect(w, h): Rect| w * h),
    ])
    .unwrap_or_else(|err| panic!("benchmark table failed to compose: {err}"));
    group.bench_function("table", |b| {
        b.iter(|| {
            let total: f64 = batch.iter().map(|s| table.apply(*s)).sum();
            black_box(total)
        });
    });

    group.finish();
}

/// Benchmark composition cost
fn bench_compose(c: &mut Criterion) {
    let mut group = c.benchmark_group("compose");

    group.bench_function("table", |b| {
        b.iter(|| {
            black_box(DispatchTable::<Shape, f64>::compose(vec![
                Handler::new(|Rect(w, h): Rect| w * h),
                Handler::new(|Square(s): Square| s * s),
                Handler::new(|Circle(r): Circle| r * r),
            ]))
        });
    });

    group.finish();
}

criterion_group!(benches, bench_dispatch, bench_compose);
criterion_main!(benches);
