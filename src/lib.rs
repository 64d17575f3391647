//! # Typeweave: Type-Directed Dataflow Graph Builder
//!
//! Typeweave turns a set of transformation functions into an executable
//! dependency graph. Each registered *builder* is an async function whose
//! signature declares what it consumes and what it produces; the compiler
//! infers the wiring from those types, validates the graph, and freezes it
//! into a [`Plan`](plan::Plan) that runs independent branches concurrently.
//!
//! ## Core Concepts
//!
//! - **Builders**: async functions `(BuilderCtx, inputs…) -> Result<Out, _>`
//!   registered with [`GraphBuilder`](graphs::GraphBuilder)
//! - **Type identity**: every value is addressed by its
//!   [`TypeKey`](types::TypeKey); one producer per type, enforced at
//!   compile time
//! - **Plan**: the immutable compiled graph, reusable across unlimited
//!   concurrent runs
//! - **Scheduler**: level-at-a-time concurrent execution with
//!   first-error-wins propagation and cooperative cancellation
//! - **Outputs**: type-indexed results queried with
//!   [`Outputs::get`](outputs::Outputs::get)
//!
//! ## Quick Start
//!
//! A small pricing pipeline: the gross price and its adjustment both flow
//! into the final response, and the compiler works out that the two
//! intermediate builders can only start after the gross price exists.
//!
//! ```rust
//! use typeweave::builders::{BuilderCtx, BuilderError};
//! use typeweave::graphs::GraphBuilder;
//!
//! #[derive(Clone)]
//! struct Cart(Vec<i64>);
//! #[derive(Clone)]
//! struct GrossPrice(i64);
//! #[derive(Clone)]
//! struct Discount(i64);
//! #[derive(Clone, Debug, PartialEq)]
//! struct FinalPrice(f64);
//!
//! async fn gross(_: BuilderCtx, cart: Cart) -> Result<GrossPrice, BuilderError> {
//!     Ok(GrossPrice(cart.0.iter().sum()))
//! }
//!
//! async fn discount(_: BuilderCtx, gross: GrossPrice) -> Result<Discount, BuilderError> {
//!     Ok(Discount(if gross.0 > 10_000 { 1_000 } else { 0 }))
//! }
//!
//! async fn total(
//!     _: BuilderCtx,
//!     gross: GrossPrice,
//!     discount: Discount,
//! ) -> Result<FinalPrice, BuilderError> {
//!     Ok(FinalPrice((gross.0 - discount.0) as f64 / 100.0))
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let plan = GraphBuilder::new()
//!         .add_builder(gross)
//!         .add_builder(discount)
//!         .add_builder(total)
//!         .compile::<(Cart,)>()?;
//!
//!     let outputs = plan.run((Cart(vec![1_000, 2_000]),)).await?;
//!     assert_eq!(outputs.get::<FinalPrice>()?, FinalPrice(30.0));
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Structural problems (two builders producing the same type, an input
//! with no producer, a dependency cycle) are caught exhaustively by
//! [`compile`](graphs::GraphBuilder::compile), so a run never encounters a
//! graph-shape error. At run time only builder failures and seed-type
//! mismatches surface, as [`RunError`](schedulers::RunError); the first
//! failing builder cancels the rest of the run.
//!
//! ## Module Guide
//!
//! - [`builders`] - Builder contract, context, and signature inspection
//! - [`seeds`] - Seed type tuples fixed at compile time
//! - [`graphs`] - Registration and compilation into a plan
//! - [`plan`] - The compiled artifact and its run entry points
//! - [`schedulers`] - Concurrent execution engine
//! - [`outputs`] - Type-indexed run results
//! - [`config`] - Per-plan execution configuration
//! - [`telemetry`] - Optional tracing subscriber bootstrap

pub mod builders;
pub mod config;
pub mod graphs;
pub mod outputs;
pub mod plan;
pub mod schedulers;
pub mod seeds;
pub mod telemetry;
pub mod types;
