//! GraphBuilder implementation: the builder-function registry.
//!
//! `GraphBuilder` accumulates builder specs through a fluent API; all
//! structural validation happens in one place when the registry is
//! compiled (see [`compile`](GraphBuilder::compile)).

use crate::builders::{BuilderSpec, IntoBuilderSpec};
use crate::config::RunConfig;

/// Fluent registry of builder functions, compiled into an executable
/// [`Plan`](crate::plan::Plan).
///
/// Registration is infallible; duplicate outputs, unresolvable inputs and
/// cycles are reported by [`compile`](Self::compile), always before a plan
/// exists.
///
/// # Examples
///
/// ```rust
/// use typeweave::builders::{BuilderCtx, BuilderError};
/// use typeweave::graphs::GraphBuilder;
///
/// #[derive(Clone)]
/// struct Cart(Vec<i64>);
/// #[derive(Clone)]
/// struct GrossPrice(i64);
///
/// async fn gross(_: BuilderCtx, cart: Cart) -> Result<GrossPrice, BuilderError> {
///     Ok(GrossPrice(cart.0.iter().sum()))
/// }
///
/// let plan = GraphBuilder::new()
///     .add_builder(gross)
///     .compile::<(Cart,)>()
///     .unwrap();
/// assert_eq!(plan.node_count(), 2);
/// ```
pub struct GraphBuilder {
    pub(crate) specs: Vec<BuilderSpec>,
    pub(crate) run_config: RunConfig,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphBuilder {
    /// Creates an empty registry with default run configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            specs: Vec::new(),
            run_config: RunConfig::default(),
        }
    }

    /// Registers a builder function.
    ///
    /// Accepts any callable conforming to the builder contract (see
    /// [`IntoBuilderSpec`]); its input and output types are extracted from
    /// the signature, no explicit wiring is declared anywhere.
    #[must_use]
    pub fn add_builder<Args>(mut self, builder: impl IntoBuilderSpec<Args>) -> Self {
        self.specs.push(builder.into_spec());
        self
    }

    /// Configures execution settings carried by the compiled plan.
    #[must_use]
    pub fn with_run_config(mut self, run_config: RunConfig) -> Self {
        self.run_config = run_config;
        self
    }

    /// Specs registered so far, in registration order.
    #[must_use]
    pub fn builders(&self) -> &[BuilderSpec] {
        &self.specs
    }
}
