use crate::domain::edge::{Edge, EdgeKind};
use crate::domain::graph::RelationGraph;
use crate::domain::node::{NodeKey, TypeNode};
use regex::Regex;
use std::collections::BTreeSet;

/// Filters applied while walking the neighborhood of a seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionOptions {
    /// Drop hidden seeds, hidden endpoints and edges touching them.
    pub use_hidden: bool,
    /// Keep cross-reference edges.
    pub use_see_also: bool,
    /// Apply the scope package's exclude patterns to every seed.
    pub force_inherit: bool,
}

impl SelectionOptions {
    pub fn package_summary() -> Self {
        Self {
            use_hidden: true,
            use_see_also: false,
            force_inherit: true,
        }
    }

    pub fn class_diagram() -> Self {
        Self {
            use_hidden: false,
            use_see_also: true,
            force_inherit: false,
        }
    }
}

/// Bounded node and edge set of one diagram.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subgraph {
    pub nodes: BTreeSet<NodeKey>,
    pub edges: BTreeSet<Edge>,
}

impl Subgraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Subgraph selector - extracts the neighborhood of each seed in a scope.
pub struct SubgraphSelector<'a> {
    graph: &'a RelationGraph,
}

impl<'a> SubgraphSelector<'a> {
    pub fn new(graph: &'a RelationGraph) -> Self {
        Self { graph }
    }

    /// Every type declared in `package` is a seed.
    pub fn select_package(&self, package: &str) -> Subgraph {
        let options = SelectionOptions::package_summary();
        let mut subgraph = Subgraph::default();
        for seed in self.graph.types_in_package(package) {
            self.fetch(Some(package), seed, options, &mut subgraph);
        }
        subgraph
    }

    /// Only the focal type is a seed; its own package is the scope.
    pub fn select_class(&self, seed: &TypeNode) -> Subgraph {
        let mut subgraph = Subgraph::default();
        self.fetch(
            seed.package.as_deref(),
            seed,
            SelectionOptions::class_diagram(),
            &mut subgraph,
        );
        subgraph
    }

    fn fetch(
        &self,
        scope: Option<&str>,
        seed: &TypeNode,
        options: SelectionOptions,
        subgraph: &mut Subgraph,
    ) {
        if options.use_hidden && seed.is_hidden() {
            return;
        }

        let package_excludes: &[Regex] = scope
            .and_then(|name| self.graph.package(name))
            .map(|p| p.excludes.as_slice())
            .unwrap_or(&[]);

        if options.force_inherit && package_excludes.iter().any(|p| p.is_match(&seed.qualified_name)) {
            return;
        }

        if seed.package.as_deref() != scope {
            return;
        }
        subgraph.nodes.insert(seed.qualified_name.clone());

        let inherit = options.force_inherit || seed.tags.inherit;
        let forward = self.graph.forward_edges(&seed.qualified_name);
        let reverse = self
            .graph
            .reverse_edges(&seed.qualified_name)
            .into_iter()
            .filter(|edge| {
                !(seed.tags.exclude_subtypes
                    && matches!(edge.kind, EdgeKind::Generalization | EdgeKind::Realization))
            });

        for edge in forward.into_iter().chain(reverse) {
            if !options.use_see_also && edge.kind == EdgeKind::SeeAlso {
                continue;
            }
            if inherit && touches(package_excludes, &edge) {
                continue;
            }
            if touches(&seed.excludes, &edge) {
                continue;
            }

            let source_hidden = options.use_hidden && self.is_hidden(&edge.source);
            let target_hidden = options.use_hidden && self.is_hidden(&edge.target);
            if !source_hidden {
                subgraph.nodes.insert(edge.source.clone());
            }
            if !target_hidden {
                subgraph.nodes.insert(edge.target.clone());
            }
            if !source_hidden && !target_hidden {
                subgraph.edges.insert(edge);
            }
        }
    }

    fn is_hidden(&self, name: &str) -> bool {
        self.graph.type_node(name).is_some_and(TypeNode::is_hidden)
    }
}

/// Whether any pattern finds a match in either endpoint's qualified name.
fn touches(patterns: &[Regex], edge: &Edge) -> bool {
    patterns
        .iter()
        .any(|p| p.is_match(&edge.source) || p.is_match(&edge.target))
}
