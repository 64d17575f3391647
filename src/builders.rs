//! Builder functions and their compile-time signature inspection.
//!
//! A *builder* is an async function that produces exactly one typed output
//! from one or more typed inputs, under the calling convention
//!
//! ```text
//! async fn(BuilderCtx, I1, …, In) -> Result<Out, BuilderError>
//! ```
//!
//! The [`IntoBuilderSpec`] trait is the signature inspector: it is
//! implemented for every function or closure of that shape (up to eight
//! inputs) and extracts the input and output [`TypeKey`]s from the generic
//! signature. A callable that drops the context parameter, declares zero
//! inputs, or returns anything but a `Result` simply does not satisfy the
//! trait bounds, so malformed builders are rejected by rustc rather than
//! at runtime.
//!
//! # Error Handling
//!
//! Builders report failure by returning [`BuilderError`]. The first error
//! in a run wins, cancels the run's [`BuilderCtx`] token, and is surfaced
//! from [`Plan::run`](crate::plan::Plan::run).
//!
//! # Examples
//!
//! ```rust
//! use typeweave::builders::{BuilderCtx, BuilderError};
//!
//! #[derive(Clone)]
//! struct Cart(Vec<i64>);
//! #[derive(Clone)]
//! struct GrossPrice(i64);
//!
//! async fn build_gross_price(_: BuilderCtx, cart: Cart) -> Result<GrossPrice, BuilderError> {
//!     if cart.0.is_empty() {
//!         return Err(BuilderError::ValidationFailed("empty cart".into()));
//!     }
//!     Ok(GrossPrice(cart.0.iter().sum()))
//! }
//! ```

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use miette::Diagnostic;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::types::TypeKey;

/// Erased value slot shared between a producer and its consumers.
///
/// Each slot is written exactly once per run; consumers clone out of the
/// shared allocation, which is why builder inputs must be `Clone`.
pub(crate) type BoxedValue = Arc<dyn Any + Send + Sync>;

/// Execution context handed to every builder invocation.
///
/// Carries the run identity and the run's cancellation signal. Cancellation
/// is advisory: a builder that never checks the token is still awaited, but
/// long-running builders should poll [`is_cancelled`](Self::is_cancelled)
/// or race their work against [`cancelled`](Self::cancelled).
#[derive(Clone, Debug)]
pub struct BuilderCtx {
    run_id: Uuid,
    builder: &'static str,
    cancellation: CancellationToken,
}

impl BuilderCtx {
    pub(crate) fn new(
        run_id: Uuid,
        builder: &'static str,
        cancellation: CancellationToken,
    ) -> Self {
        Self {
            run_id,
            builder,
            cancellation,
        }
    }

    /// Identifier of the current run, stable across all builders of the run.
    #[must_use]
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Name of the type this builder produces; useful in builder-side logs.
    #[must_use]
    pub fn builder(&self) -> &'static str {
        self.builder
    }

    /// Whether the run has been cancelled (by the caller or a failed sibling).
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Resolves when the run is cancelled. Intended for `tokio::select!`
    /// against the builder's own work.
    pub async fn cancelled(&self) {
        self.cancellation.cancelled().await;
    }
}

/// Errors a builder function may return.
///
/// These are data/logic failures of a single builder; structural problems
/// with the graph itself are caught earlier by
/// [`compile`](crate::graphs::GraphBuilder::compile) and never reach a
/// builder.
#[derive(Debug, Error, Diagnostic)]
pub enum BuilderError {
    /// Expected input data is present but unusable (wrong state, not wrong type).
    #[error("missing expected input: {what}")]
    #[diagnostic(
        code(typeweave::builder::missing_input),
        help("Check that the upstream builder produced the data this builder needs.")
    )]
    MissingInput { what: &'static str },

    /// Input validation failed.
    #[error("validation failed: {0}")]
    #[diagnostic(code(typeweave::builder::validation))]
    ValidationFailed(String),

    /// External provider or service error.
    #[error("provider error ({provider}): {message}")]
    #[diagnostic(code(typeweave::builder::provider))]
    Provider {
        provider: &'static str,
        message: String,
    },

    /// The builder observed the run's cancellation signal and stopped early.
    #[error("builder stopped on cancellation")]
    #[diagnostic(code(typeweave::builder::cancelled))]
    Cancelled,

    /// Any other failure.
    #[error("builder failed: {0}")]
    #[diagnostic(code(typeweave::builder::other))]
    Other(String),
}

impl BuilderError {
    /// Wrap an arbitrary error as [`BuilderError::Other`].
    pub fn other(err: impl fmt::Display) -> Self {
        Self::Other(err.to_string())
    }
}

/// Type-erased builder invocation object.
///
/// `invoke` receives the input values in the order declared by the
/// builder's signature and returns the erased output value.
#[async_trait]
pub(crate) trait Builder: Send + Sync {
    async fn invoke(
        &self,
        ctx: BuilderCtx,
        inputs: Vec<BoxedValue>,
    ) -> Result<BoxedValue, BuilderError>;
}

/// Immutable descriptor of one registered builder function.
///
/// Created by [`IntoBuilderSpec::into_spec`] at registration time and never
/// mutated. A spec is named after the type it produces, which is unique
/// within a plan by the one-producer-per-type invariant.
#[derive(Clone)]
pub struct BuilderSpec {
    name: &'static str,
    output: TypeKey,
    inputs: Vec<TypeKey>,
    callable: Arc<dyn Builder>,
}

impl BuilderSpec {
    /// Name of the produced type.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Key of the produced type.
    #[must_use]
    pub fn output(&self) -> TypeKey {
        self.output
    }

    /// Keys of the required inputs, in declaration order.
    #[must_use]
    pub fn inputs(&self) -> &[TypeKey] {
        &self.inputs
    }

    pub(crate) fn callable(&self) -> Arc<dyn Builder> {
        Arc::clone(&self.callable)
    }
}

impl fmt::Debug for BuilderSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuilderSpec")
            .field("output", &self.output)
            .field("inputs", &self.inputs)
            .finish_non_exhaustive()
    }
}

/// Conversion from a conforming callable into a [`BuilderSpec`].
///
/// Implemented for async functions and closures taking a [`BuilderCtx`]
/// followed by one to eight `Clone + Send + Sync + 'static` inputs and
/// returning `Result<Out, BuilderError>`. The `Args` parameter is the input
/// tuple and exists only so the implementations do not overlap; callers
/// let inference pick it.
pub trait IntoBuilderSpec<Args> {
    fn into_spec(self) -> BuilderSpec;
}

/// Adapter giving a plain function object the erased [`Builder`] interface.
struct FnBuilder<F, Args> {
    f: F,
    _args: PhantomData<fn() -> Args>,
}

macro_rules! impl_into_builder_spec {
    ($($input:ident $idx:tt),+) => {
        #[async_trait]
        impl<F, Fut, Out, $($input,)+> Builder for FnBuilder<F, ($($input,)+)>
        where
            F: Fn(BuilderCtx, $($input),+) -> Fut + Send + Sync,
            Fut: Future<Output = Result<Out, BuilderError>> + Send,
            Out: Send + Sync + 'static,
            $($input: Clone + Send + Sync + 'static,)+
        {
            async fn invoke(
                &self,
                ctx: BuilderCtx,
                inputs: Vec<BoxedValue>,
            ) -> Result<BoxedValue, BuilderError> {
                let out = (self.f)(
                    ctx,
                    $(inputs[$idx]
                        .downcast_ref::<$input>()
                        .expect("input slot type fixed at compile time")
                        .clone(),)+
                )
                .await?;
                Ok(Arc::new(out) as BoxedValue)
            }
        }

        impl<F, Fut, Out, $($input,)+> IntoBuilderSpec<($($input,)+)> for F
        where
            F: Fn(BuilderCtx, $($input),+) -> Fut + Send + Sync + 'static,
            Fut: Future<Output = Result<Out, BuilderError>> + Send + 'static,
            Out: Send + Sync + 'static,
            $($input: Clone + Send + Sync + 'static,)+
        {
            fn into_spec(self) -> BuilderSpec {
                BuilderSpec {
                    name: TypeKey::of::<Out>().name(),
                    output: TypeKey::of::<Out>(),
                    inputs: vec![$(TypeKey::of::<$input>(),)+],
                    callable: Arc::new(FnBuilder {
                        f: self,
                        _args: PhantomData,
                    }),
                }
            }
        }
    };
}

impl_into_builder_spec!(I0 0);
impl_into_builder_spec!(I0 0, I1 1);
impl_into_builder_spec!(I0 0, I1 1, I2 2);
impl_into_builder_spec!(I0 0, I1 1, I2 2, I3 3);
impl_into_builder_spec!(I0 0, I1 1, I2 2, I3 3, I4 4);
impl_into_builder_spec!(I0 0, I1 1, I2 2, I3 3, I4 4, I5 5);
impl_into_builder_spec!(I0 0, I1 1, I2 2, I3 3, I4 4, I5 5, I6 6);
impl_into_builder_spec!(I0 0, I1 1, I2 2, I3 3, I4 4, I5 5, I6 6, I7 7);
