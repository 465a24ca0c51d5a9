//! Criterion benchmarks for graph synthesis (`oscmooth-core::compiler`).
//!
//! Two axes:
//!
//! - **Compile**: validation + synthesis + commit for growing parameter lists
//! - **Evaluate**: one reference-evaluator frame over the generated graph
//!
//! Run with: `cargo bench -p oscmooth-core`
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use oscmooth_core::{CompileOptions, Evaluator, HostGraph, NoProgress, ParameterSpec, compile};

const PARAMETER_COUNTS: &[usize] = &[1, 8, 24];

/// Alternates smoothing-only and 4-bit signed parameters.
fn make_specs(n: usize) -> Vec<ParameterSpec> {
    (0..n)
        .map(|i| {
            let spec = ParameterSpec::new(format!("Param{i}"));
            if i % 2 == 0 { spec } else { spec.with_quantization(4, true) }
        })
        .collect()
}

fn compiled(n: usize) -> HostGraph {
    let mut host = HostGraph::new("bench");
    compile(&mut host, &make_specs(n), &CompileOptions::new(), &mut NoProgress).unwrap();
    host
}

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");
    for &n in PARAMETER_COUNTS {
        let specs = make_specs(n);
        group.bench_with_input(BenchmarkId::new("fresh", n), &specs, |b, specs| {
            b.iter(|| {
                let mut host = HostGraph::new("bench");
                black_box(compile(&mut host, specs, &CompileOptions::new(), &mut NoProgress).unwrap());
            });
        });

        // Recompiling reuses channels and replaces the layer.
        let base = compiled(n);
        group.bench_with_input(BenchmarkId::new("recompile", n), &specs, |b, specs| {
            b.iter(|| {
                let mut host = base.clone();
                black_box(compile(&mut host, specs, &CompileOptions::new(), &mut NoProgress).unwrap());
            });
        });
    }
    group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");
    for &n in PARAMETER_COUNTS {
        let host = compiled(n);
        group.bench_with_input(BenchmarkId::new("frame", n), &host, |b, host| {
            let mut eval = Evaluator::new(host);
            eval.set("IsLocal", 1.0);
            b.iter(|| black_box(eval.step()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_compile, bench_evaluate);
criterion_main!(benches);
