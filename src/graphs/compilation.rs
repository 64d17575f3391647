//! Plan compilation: structural validation and dependency leveling.
//!
//! Compilation resolves every builder input against the set of producers
//! (seeds plus builder outputs), rejects ambiguous or incomplete graphs,
//! and freezes a leveling of the nodes: level zero is the seeds, and each
//! later level contains exactly the nodes whose inputs are all produced by
//! earlier levels. The leveling doubles as the topological order and as
//! the unit of concurrent execution.

use miette::Diagnostic;
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::{debug, instrument};

use super::builder::GraphBuilder;
use crate::plan::{Node, Plan};
use crate::seeds::SeedSet;
use crate::types::TypeKey;

/// Structural errors detected while compiling a registry into a plan.
///
/// All of these are fatal to compilation and must be fixed by changing the
/// registration; none are retried, and a plan is never produced for a
/// graph that exhibits one.
#[derive(Debug, Error, Diagnostic)]
pub enum CompileError {
    /// Two producers (builders or seeds) declare the same output type.
    #[error("duplicate producer for type {type_name}")]
    #[diagnostic(
        code(typeweave::compile::duplicate_producer),
        help("Each type may have exactly one producer: a seed or a single builder output.")
    )]
    DuplicateProducer { type_name: &'static str },

    /// A builder requires a type that no seed or builder produces.
    #[error("no producer for type {missing}, required by the builder of {required_by}")]
    #[diagnostic(
        code(typeweave::compile::unresolved_dependency),
        help("Register a builder producing this type, or add it to the seed tuple.")
    )]
    UnresolvedDependency {
        missing: &'static str,
        required_by: &'static str,
    },

    /// The dependency graph contains a cycle.
    #[error("cyclic dependency among: {}", .members.join(", "))]
    #[diagnostic(
        code(typeweave::compile::cyclic_dependency),
        help("Break the cycle: some builder in this set must take its input from a seed or an earlier stage.")
    )]
    CyclicDependency { members: Vec<&'static str> },
}

impl GraphBuilder {
    /// Compiles the registered builders against the seed types `S` into an
    /// immutable, reusable [`Plan`].
    ///
    /// `S` is a tuple of the types the caller will supply to every run;
    /// only the types are fixed here, values come later. Every registered
    /// builder is part of the plan: after validation each builder's input
    /// chain necessarily bottoms out at a seed, so there are no dormant
    /// nodes to prune.
    ///
    /// # Errors
    ///
    /// [`CompileError::DuplicateProducer`] for ambiguous outputs (including
    /// a seed colliding with a builder output),
    /// [`CompileError::UnresolvedDependency`] for inputs without a
    /// producer, and [`CompileError::CyclicDependency`] when the graph is
    /// not acyclic.
    #[instrument(skip(self), level = "debug", fields(builders = self.specs.len()))]
    pub fn compile<S: SeedSet>(self) -> Result<Plan, CompileError> {
        let seed_keys = S::keys();
        let mut nodes: FxHashMap<TypeKey, Node> = FxHashMap::default();

        for key in &seed_keys {
            if nodes.insert(*key, Node::seed(*key)).is_some() {
                return Err(CompileError::DuplicateProducer {
                    type_name: key.name(),
                });
            }
        }
        for spec in self.specs {
            let key = spec.output();
            if nodes.contains_key(&key) {
                return Err(CompileError::DuplicateProducer {
                    type_name: key.name(),
                });
            }
            nodes.insert(key, Node::builder(spec));
        }

        for node in nodes.values() {
            for dep in node.deps() {
                if !nodes.contains_key(dep) {
                    return Err(CompileError::UnresolvedDependency {
                        missing: dep.name(),
                        required_by: node.output().name(),
                    });
                }
            }
        }

        let levels = level_order(&nodes)?;
        debug!(
            nodes = nodes.len(),
            levels = levels.len(),
            "compiled plan"
        );
        Ok(Plan::from_parts(nodes, levels, seed_keys, self.run_config))
    }
}

/// Kahn's algorithm, grouped into dependency levels.
///
/// Each pass peels off every node whose in-degree reached zero; the passes
/// become the plan's levels. Nodes left with positive in-degree after the
/// frontier drains are exactly the cycle members. Levels are sorted by
/// type name so orderings are reproducible across builds.
fn level_order(nodes: &FxHashMap<TypeKey, Node>) -> Result<Vec<Vec<TypeKey>>, CompileError> {
    let mut in_degree: FxHashMap<TypeKey, usize> = nodes
        .iter()
        .map(|(key, node)| (*key, node.deps().len()))
        .collect();
    let mut consumers: FxHashMap<TypeKey, Vec<TypeKey>> = FxHashMap::default();
    for (key, node) in nodes {
        for dep in node.deps() {
            consumers.entry(*dep).or_default().push(*key);
        }
    }

    let mut frontier: Vec<TypeKey> = in_degree
        .iter()
        .filter(|(_, degree)| **degree == 0)
        .map(|(key, _)| *key)
        .collect();
    frontier.sort_unstable();

    let mut levels: Vec<Vec<TypeKey>> = Vec::new();
    let mut placed = 0_usize;
    while !frontier.is_empty() {
        placed += frontier.len();
        let mut next: Vec<TypeKey> = Vec::new();
        for key in &frontier {
            for consumer in consumers.get(key).into_iter().flatten() {
                let degree = in_degree
                    .get_mut(consumer)
                    .expect("consumer is a node in the table");
                *degree -= 1;
                if *degree == 0 {
                    next.push(*consumer);
                }
            }
        }
        next.sort_unstable();
        levels.push(std::mem::replace(&mut frontier, next));
    }

    if placed != nodes.len() {
        let mut members: Vec<&'static str> = in_degree
            .iter()
            .filter(|(_, degree)| **degree > 0)
            .map(|(key, _)| key.name())
            .collect();
        members.sort_unstable();
        return Err(CompileError::CyclicDependency { members });
    }
    Ok(levels)
}
