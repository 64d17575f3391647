//! Graph definition and compilation.
//!
//! This module is the front door of the crate: [`GraphBuilder`] collects
//! builder functions, and [`compile`](GraphBuilder::compile) resolves their
//! signatures into a validated, leveled [`Plan`](crate::plan::Plan).
//!
//! # Core Concepts
//!
//! - **Builders**: async functions producing one typed output from typed
//!   inputs (see [`crate::builders`])
//! - **Seeds**: caller-supplied types fixed by the tuple passed to
//!   `compile` (see [`crate::seeds`])
//! - **Resolution**: inputs are matched to producers purely by type, no
//!   explicit edges are declared anywhere
//! - **Validation**: duplicate producers, unresolved inputs and cycles are
//!   all rejected before a plan exists
//!
//! # Quick Start
//!
//! ```rust
//! use typeweave::builders::{BuilderCtx, BuilderError};
//! use typeweave::graphs::GraphBuilder;
//!
//! #[derive(Clone)]
//! struct Celsius(f64);
//! #[derive(Clone)]
//! struct Fahrenheit(f64);
//!
//! async fn convert(_: BuilderCtx, c: Celsius) -> Result<Fahrenheit, BuilderError> {
//!     Ok(Fahrenheit(c.0 * 9.0 / 5.0 + 32.0))
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let plan = GraphBuilder::new()
//!     .add_builder(convert)
//!     .compile::<(Celsius,)>()?;
//!
//! let outputs = plan.run((Celsius(100.0),)).await?;
//! assert_eq!(outputs.get::<Fahrenheit>()?.0, 212.0);
//! # Ok(())
//! # }
//! ```
//!
//! # petgraph Integration
//!
//! With the `petgraph-compat` feature, compiled plans convert to petgraph
//! format for advanced analysis and DOT visualization:
//!
//! ```ignore
//! // Enable with: typeweave = { features = ["petgraph-compat"] }
//! let pg = plan.to_petgraph();
//! assert!(!petgraph::algo::is_cyclic_directed(&pg.graph));
//! std::fs::write("plan.dot", plan.to_dot())?;
//! ```

mod builder;
mod compilation;

#[cfg(feature = "petgraph-compat")]
mod petgraph_compat;

pub use builder::GraphBuilder;
pub use compilation::CompileError;

#[cfg(feature = "petgraph-compat")]
pub use petgraph_compat::{PetgraphConversion, PlanDiGraph, is_cyclic};
