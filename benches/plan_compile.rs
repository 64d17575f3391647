//! Benchmarks for plan compilation and execution.
//!
//! Measures signature resolution + validation + leveling on two graph
//! shapes (a 12-stage chain and an 8-wide fan-in), and full runs of the
//! same plans on a multi-thread runtime.

use criterion::{Criterion, criterion_group, criterion_main};
use typeweave::builders::{BuilderCtx, BuilderError};
use typeweave::graphs::GraphBuilder;

#[derive(Clone)]
struct Seed(u64);

macro_rules! chain_stage {
    ($ty:ident, $func:ident, $prev:ty) => {
        #[derive(Clone)]
        struct $ty(u64);
        async fn $func(_: BuilderCtx, prev: $prev) -> Result<$ty, BuilderError> {
            Ok($ty(prev.0 + 1))
        }
    };
}

chain_stage!(C1, c1, Seed);
chain_stage!(C2, c2, C1);
chain_stage!(C3, c3, C2);
chain_stage!(C4, c4, C3);
chain_stage!(C5, c5, C4);
chain_stage!(C6, c6, C5);
chain_stage!(C7, c7, C6);
chain_stage!(C8, c8, C7);
chain_stage!(C9, c9, C8);
chain_stage!(C10, c10, C9);
chain_stage!(C11, c11, C10);
chain_stage!(C12, c12, C11);

fn linear_graph() -> GraphBuilder {
    GraphBuilder::new()
        .add_builder(c1)
        .add_builder(c2)
        .add_builder(c3)
        .add_builder(c4)
        .add_builder(c5)
        .add_builder(c6)
        .add_builder(c7)
        .add_builder(c8)
        .add_builder(c9)
        .add_builder(c10)
        .add_builder(c11)
        .add_builder(c12)
}

macro_rules! fan_stage {
    ($ty:ident, $func:ident) => {
        #[derive(Clone)]
        struct $ty(u64);
        async fn $func(_: BuilderCtx, seed: Seed) -> Result<$ty, BuilderError> {
            Ok($ty(seed.0 * 2))
        }
    };
}

fan_stage!(W1, w1);
fan_stage!(W2, w2);
fan_stage!(W3, w3);
fan_stage!(W4, w4);
fan_stage!(W5, w5);
fan_stage!(W6, w6);
fan_stage!(W7, w7);
fan_stage!(W8, w8);

#[derive(Clone)]
struct Gathered(u64);

#[allow(clippy::too_many_arguments)]
async fn gather(
    _: BuilderCtx,
    a: W1,
    b: W2,
    c: W3,
    d: W4,
    e: W5,
    f: W6,
    g: W7,
    h: W8,
) -> Result<Gathered, BuilderError> {
    Ok(Gathered(
        a.0 + b.0 + c.0 + d.0 + e.0 + f.0 + g.0 + h.0,
    ))
}

fn fanout_graph() -> GraphBuilder {
    GraphBuilder::new()
        .add_builder(w1)
        .add_builder(w2)
        .add_builder(w3)
        .add_builder(w4)
        .add_builder(w5)
        .add_builder(w6)
        .add_builder(w7)
        .add_builder(w8)
        .add_builder(gather)
}

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan_compile");

    group.bench_function("linear_12", |b| {
        b.iter(|| linear_graph().compile::<(Seed,)>().expect("compiles"));
    });
    group.bench_function("fanout_8", |b| {
        b.iter(|| fanout_graph().compile::<(Seed,)>().expect("compiles"));
    });

    group.finish();
}

fn bench_run(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().expect("runtime");
    let mut group = c.benchmark_group("plan_run");

    let linear = linear_graph().compile::<(Seed,)>().expect("compiles");
    group.bench_function("linear_12", |b| {
        b.to_async(&rt)
            .iter(|| async { linear.run((Seed(1),)).await.expect("runs") });
    });

    let fanout = fanout_graph().compile::<(Seed,)>().expect("compiles");
    group.bench_function("fanout_8", |b| {
        b.to_async(&rt)
            .iter(|| async { fanout.run((Seed(1),)).await.expect("runs") });
    });

    group.finish();
}

criterion_group!(benches, bench_compile, bench_run);
criterion_main!(benches);
