//! Structural validation of plan compilation.
//!
//! Covers the compile-time error taxonomy (duplicate producers, unresolved
//! inputs, cycles) and the shape guarantees of a successful compile.

mod common;

use common::*;
use typeweave::builders::{BuilderCtx, BuilderError};
use typeweave::graphs::{CompileError, GraphBuilder};
use typeweave::types::TypeKey;

#[test]
fn compile_succeeds_with_a_producer_for_every_input() {
    let plan = pricing_graph().compile::<(AppRequest,)>().unwrap();

    // One node per distinct output type, the seed included.
    assert_eq!(plan.node_count(), 4);
    assert_eq!(plan.seed_types(), &[TypeKey::of::<AppRequest>()]);
    assert_eq!(plan.levels()[0], vec![TypeKey::of::<AppRequest>()]);
}

#[test]
fn seed_node_is_the_only_seed() {
    let plan = pricing_graph().compile::<(AppRequest,)>().unwrap();
    let seeds: Vec<_> = plan.nodes().filter(|node| node.is_seed()).collect();
    assert_eq!(seeds.len(), 1);
    assert_eq!(seeds[0].output(), TypeKey::of::<AppRequest>());
}

#[test]
fn duplicate_builder_output_is_rejected() {
    let err = pricing_graph()
        .add_builder(build_gross_price)
        .compile::<(AppRequest,)>()
        .unwrap_err();
    match err {
        CompileError::DuplicateProducer { type_name } => {
            assert!(type_name.ends_with("GrossPrice"), "got {type_name}");
        }
        other => panic!("expected DuplicateProducer, got: {other:?}"),
    }
}

#[test]
fn seed_colliding_with_builder_output_is_rejected() {
    let err = pricing_graph()
        .compile::<(AppRequest, GrossPrice)>()
        .unwrap_err();
    assert!(matches!(err, CompileError::DuplicateProducer { type_name } if type_name.ends_with("GrossPrice")));
}

#[test]
fn missing_producer_is_rejected() {
    // No gross-price builder: the adjustment builder's input has no producer.
    let err = GraphBuilder::new()
        .add_builder(build_price_adjustment)
        .compile::<(AppRequest,)>()
        .unwrap_err();
    match err {
        CompileError::UnresolvedDependency {
            missing,
            required_by,
        } => {
            assert!(missing.ends_with("GrossPrice"));
            assert!(required_by.ends_with("PriceAdjustment"));
        }
        other => panic!("expected UnresolvedDependency, got: {other:?}"),
    }
}

#[test]
fn two_builder_cycle_is_rejected() {
    #[derive(Clone)]
    struct Alpha(i64);
    #[derive(Clone)]
    struct Beta(i64);

    async fn needs_beta(_: BuilderCtx, b: Beta) -> Result<Alpha, BuilderError> {
        Ok(Alpha(b.0))
    }
    async fn needs_alpha(_: BuilderCtx, a: Alpha) -> Result<Beta, BuilderError> {
        Ok(Beta(a.0))
    }

    let err = GraphBuilder::new()
        .add_builder(needs_beta)
        .add_builder(needs_alpha)
        .compile::<(AppRequest,)>()
        .unwrap_err();
    match err {
        CompileError::CyclicDependency { members } => {
            assert_eq!(members.len(), 2);
            assert!(members.iter().any(|name| name.ends_with("Alpha")));
            assert!(members.iter().any(|name| name.ends_with("Beta")));
        }
        other => panic!("expected CyclicDependency, got: {other:?}"),
    }
}

#[test]
fn self_cycle_is_rejected() {
    #[derive(Clone)]
    struct Fixpoint(i64);

    async fn fixpoint(_: BuilderCtx, f: Fixpoint) -> Result<Fixpoint, BuilderError> {
        Ok(f)
    }

    let err = GraphBuilder::new()
        .add_builder(fixpoint)
        .compile::<(AppRequest,)>()
        .unwrap_err();
    assert!(matches!(err, CompileError::CyclicDependency { .. }));
}

#[tokio::test]
async fn compiling_twice_yields_equivalent_plans() {
    let first = pricing_graph().compile::<(AppRequest,)>().unwrap();
    let second = pricing_graph().compile::<(AppRequest,)>().unwrap();
    assert_eq!(first.levels(), second.levels());

    let seed = cart(&[1_000, 2_000]);
    let out_first = first.run((seed.clone(),)).await.unwrap();
    let out_second = second.run((seed,)).await.unwrap();
    assert_eq!(
        out_first.get::<AppResponse>().unwrap(),
        out_second.get::<AppResponse>().unwrap()
    );
}

#[test]
fn error_messages_name_the_types() {
    let err = pricing_graph()
        .add_builder(build_gross_price)
        .compile::<(AppRequest,)>()
        .unwrap_err();
    assert!(err.to_string().contains("duplicate producer"));
    assert!(err.to_string().contains("GrossPrice"));
}
