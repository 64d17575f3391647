//! The compiled, reusable execution plan.
//!
//! A [`Plan`] is produced once by
//! [`GraphBuilder::compile`](crate::graphs::GraphBuilder::compile) and then
//! shared freely: it is immutable, `Send + Sync`, and any number of
//! [`run`](Plan::run) invocations may execute against the same plan
//! concurrently, each with its own seed values and its own
//! [`Outputs`](crate::outputs::Outputs).

use rustc_hash::{FxHashMap, FxHashSet};
use tokio_util::sync::CancellationToken;

use crate::builders::BuilderSpec;
use crate::config::RunConfig;
use crate::outputs::Outputs;
use crate::schedulers::{RunError, Scheduler};
use crate::seeds::{SeedSet, SeedValues};
use crate::types::TypeKey;

/// Origin of a node's value.
#[derive(Clone, Debug)]
pub(crate) enum NodeSource {
    /// Supplied by the caller at the start of each run.
    Seed,
    /// Computed by a registered builder.
    Builder(BuilderSpec),
}

/// One vertex of the compiled graph: a seed slot or a builder, together
/// with the keys of its dependencies. Dependencies reference other nodes
/// through the plan's node table, they are not owning edges.
#[derive(Clone, Debug)]
pub struct Node {
    output: TypeKey,
    deps: Vec<TypeKey>,
    source: NodeSource,
}

impl Node {
    pub(crate) fn seed(output: TypeKey) -> Self {
        Self {
            output,
            deps: Vec::new(),
            source: NodeSource::Seed,
        }
    }

    pub(crate) fn builder(spec: BuilderSpec) -> Self {
        Self {
            output: spec.output(),
            deps: spec.inputs().to_vec(),
            source: NodeSource::Builder(spec),
        }
    }

    /// Key of the type this node produces.
    #[must_use]
    pub fn output(&self) -> TypeKey {
        self.output
    }

    /// Keys this node consumes, in declaration order. Empty for seeds.
    #[must_use]
    pub fn deps(&self) -> &[TypeKey] {
        &self.deps
    }

    /// Whether this node is a caller-supplied seed.
    #[must_use]
    pub fn is_seed(&self) -> bool {
        matches!(self.source, NodeSource::Seed)
    }

    pub(crate) fn spec(&self) -> Option<&BuilderSpec> {
        match &self.source {
            NodeSource::Seed => None,
            NodeSource::Builder(spec) => Some(spec),
        }
    }
}

/// Immutable compiled dependency graph plus its execution ordering.
///
/// The node table maps every [`TypeKey`] to its single producer; the
/// levels group nodes into waves of mutually-independent work (level zero
/// is the seeds). Both are frozen at compile time, so runs never take a
/// lock on the plan.
#[derive(Debug)]
pub struct Plan {
    nodes: FxHashMap<TypeKey, Node>,
    levels: Vec<Vec<TypeKey>>,
    seed_keys: Vec<TypeKey>,
    config: RunConfig,
}

impl Plan {
    pub(crate) fn from_parts(
        nodes: FxHashMap<TypeKey, Node>,
        levels: Vec<Vec<TypeKey>>,
        seed_keys: Vec<TypeKey>,
        config: RunConfig,
    ) -> Self {
        Self {
            nodes,
            levels,
            seed_keys,
            config,
        }
    }

    /// Total number of nodes, seeds included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Seed type keys fixed at compile time, in declaration order.
    #[must_use]
    pub fn seed_types(&self) -> &[TypeKey] {
        &self.seed_keys
    }

    /// Dependency levels: each level only consumes values produced by
    /// earlier levels, and nodes within a level are mutually independent.
    #[must_use]
    pub fn levels(&self) -> &[Vec<TypeKey>] {
        &self.levels
    }

    /// Iterate over all nodes in the plan.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub(crate) fn node(&self, key: TypeKey) -> &Node {
        &self.nodes[&key]
    }

    /// Execute the plan against `seeds` under a fresh cancellation scope.
    ///
    /// # Errors
    ///
    /// See [`run_with_cancellation`](Self::run_with_cancellation).
    pub async fn run<S: SeedSet>(&self, seeds: S) -> Result<Outputs, RunError> {
        self.run_with_cancellation(CancellationToken::new(), seeds)
            .await
    }

    /// Execute the plan against `seeds`, observing a caller-held
    /// cancellation token.
    ///
    /// Cancelling the token stops the launch of further builders; builders
    /// already in flight are awaited. The first builder failure likewise
    /// cancels the token for the remainder of the run.
    ///
    /// # Errors
    ///
    /// - [`RunError::SeedTypeMismatch`] if the seed types differ from the
    ///   set fixed at compile time.
    /// - [`RunError::Builder`] carrying the first builder failure.
    /// - [`RunError::Cancelled`] if cancellation stopped the run before
    ///   every node completed.
    pub async fn run_with_cancellation<S: SeedSet>(
        &self,
        cancellation: CancellationToken,
        seeds: S,
    ) -> Result<Outputs, RunError> {
        self.check_seed_types(&S::keys())?;
        let mut values = SeedValues::default();
        seeds.store(&mut values);
        Scheduler::from_config(&self.config)
            .execute(self, values, cancellation)
            .await
    }

    fn check_seed_types(&self, provided: &[TypeKey]) -> Result<(), RunError> {
        let expected: FxHashSet<TypeKey> = self.seed_keys.iter().copied().collect();
        let got: FxHashSet<TypeKey> = provided.iter().copied().collect();
        if expected != got {
            return Err(RunError::SeedTypeMismatch {
                expected: joined_names(&self.seed_keys),
                provided: joined_names(provided),
            });
        }
        Ok(())
    }
}

fn joined_names(keys: &[TypeKey]) -> String {
    let mut names: Vec<_> = keys.iter().map(TypeKey::name).collect();
    names.sort_unstable();
    names.join(", ")
}
