//! Optional petgraph compatibility layer.
//!
//! Converts a compiled [`Plan`] into a petgraph `DiGraph` for analysis and
//! DOT visualization, a debug/documentation aid for inspecting what the
//! compiler inferred from builder signatures. Nothing here affects run
//! semantics; a plan renders the same whether or not it is ever executed.
//!
//! # Feature Gate
//!
//! Only available with the `petgraph-compat` feature:
//!
//! ```toml
//! [dependencies]
//! typeweave = { version = "0.1", features = ["petgraph-compat"] }
//! ```
//!
//! # Examples
//!
//! ```ignore
//! let plan = GraphBuilder::new()
//!     .add_builder(gross)
//!     .compile::<(Cart,)>()?;
//!
//! let dot = plan.to_dot();
//! std::fs::write("plan.dot", dot)?;
//! // Then: dot -Tsvg plan.dot -o plan.svg
//! ```

use petgraph::graph::{DiGraph, NodeIndex};
use rustc_hash::FxHashMap;

use crate::plan::Plan;
use crate::types::TypeKey;

/// A petgraph-compatible directed graph of a compiled plan.
///
/// Node weights are [`TypeKey`]s; edges point from a producer to each of
/// its consumers (the direction data flows).
pub type PlanDiGraph = DiGraph<TypeKey, ()>;

/// Result of converting a plan to petgraph format.
#[derive(Debug, Clone)]
pub struct PetgraphConversion {
    /// The petgraph directed graph.
    pub graph: PlanDiGraph,
    /// Mapping from each plan [`TypeKey`] to its petgraph index.
    pub index_map: FxHashMap<TypeKey, NodeIndex>,
}

impl PetgraphConversion {
    /// Look up the petgraph index of a type.
    #[must_use]
    pub fn index_of(&self, key: &TypeKey) -> Option<NodeIndex> {
        self.index_map.get(key).copied()
    }

    /// Get the [`TypeKey`] at a petgraph index.
    #[must_use]
    pub fn node_at(&self, index: NodeIndex) -> Option<&TypeKey> {
        self.graph.node_weight(index)
    }
}

impl Plan {
    /// Convert this plan to a petgraph `DiGraph`.
    ///
    /// Node indices are deterministic: types are added sorted by name.
    #[must_use]
    pub fn to_petgraph(&self) -> PetgraphConversion {
        let mut graph = DiGraph::new();
        let mut index_map: FxHashMap<TypeKey, NodeIndex> = FxHashMap::default();

        let mut keys: Vec<TypeKey> = self.nodes().map(|node| node.output()).collect();
        keys.sort_unstable();
        for key in keys {
            let idx = graph.add_node(key);
            index_map.insert(key, idx);
        }

        for node in self.nodes() {
            let to = index_map[&node.output()];
            for dep in node.deps() {
                graph.add_edge(index_map[dep], to, ());
            }
        }

        PetgraphConversion { graph, index_map }
    }

    /// Export this plan to DOT format for rendering with Graphviz.
    ///
    /// Seeds are filled green; builder nodes are plain boxes labelled with
    /// the short name of the type they produce.
    #[must_use]
    pub fn to_dot(&self) -> String {
        use std::fmt::Write;

        let conversion = self.to_petgraph();
        let mut output = String::new();

        writeln!(output, "digraph {{").unwrap();
        writeln!(output, "    rankdir=TB;").unwrap();
        writeln!(output, "    node [shape=box, style=rounded];").unwrap();

        for idx in conversion.graph.node_indices() {
            let key = conversion.graph.node_weight(idx).unwrap();
            let style = if self.node_is_seed(key) {
                " style=\"filled\" fillcolor=\"lightgreen\""
            } else {
                ""
            };
            writeln!(
                output,
                "    {} [ label=\"{}\"{} ];",
                idx.index(),
                key.short_name(),
                style
            )
            .unwrap();
        }

        writeln!(output).unwrap();

        for edge in conversion.graph.edge_indices() {
            let (from, to) = conversion.graph.edge_endpoints(edge).unwrap();
            writeln!(output, "    {} -> {};", from.index(), to.index()).unwrap();
        }

        writeln!(output, "}}").unwrap();
        output
    }

    fn node_is_seed(&self, key: &TypeKey) -> bool {
        self.nodes().any(|node| node.output() == *key && node.is_seed())
    }
}

/// Check a plan's edges for cycles using petgraph's algorithm.
///
/// Cross-verification helper: always `false` for a plan that compiled,
/// since compilation rejects cyclic graphs.
#[must_use]
pub fn is_cyclic(plan: &Plan) -> bool {
    petgraph::algo::is_cyclic_directed(&plan.to_petgraph().graph)
}
