use RustedCalculus::Examples::calculus_examples::calculus_examples;
use RustedCalculus::numerical::quadrature::{QuadMethod, integrate};
use RustedCalculus::numerical::root_finding::RootSweeper;
use RustedCalculus::symbolic::expression::Expression;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

const FUNCTION: &str = "x^5 - 4x^3 + 2sin(x) - (x^2 - 3e^x) + 0.5cos(x)";

fn bench_parse_and_diff(c: &mut Criterion) {
    c.bench_function("parse and second derivative", |b| {
        b.iter(|| Expression::parse(black_box(FUNCTION)).nth_derivative(2))
    });
}

fn bench_root_sweep(c: &mut Criterion) {
    let derivative = Expression::parse(FUNCTION).diff();
    let sweeper = RootSweeper::new();
    c.bench_function("sweep of f' on [-10, 10]", |b| {
        b.iter(|| sweeper.find_roots(&derivative, black_box(-10.0), black_box(10.0)))
    });
}

fn bench_quadrature(c: &mut Criterion) {
    let f = Expression::parse(FUNCTION);
    let mut group = c.benchmark_group("quadrature, n = 1000");
    for method in [QuadMethod::Trapezoid, QuadMethod::Simpson, QuadMethod::GaussLegendre] {
        group.bench_function(method.to_string(), |b| {
            b.iter(|| integrate(&f, black_box(0.0), black_box(2.0), 1000, method))
        });
    }
    group.finish();
}

fn bench_derivative_analysis_example(c: &mut Criterion) {
    c.bench_function("derivative analysis example", |b| b.iter(|| calculus_examples(3)));
}

criterion_group!(
    benches,
    bench_parse_and_diff,
    bench_root_sweep,
    bench_quadrature,
    bench_derivative_analysis_example
);
criterion_main!(benches);
