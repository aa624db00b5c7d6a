use crate::domain::edge::{Edge, Relation};
use crate::domain::node::{NodeKey, PackageNode, TypeNode};
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Relation Graph - the program-wide relationship model.
///
/// Type nodes live in a petgraph arena addressed by qualified name; forward and reverse
/// edge queries are outgoing and incoming edge walks. Read-only once built.
#[derive(Debug, Default)]
pub struct RelationGraph {
    /// The directed graph of types and relations
    pub graph: DiGraph<TypeNode, Relation>,

    /// Mapping from qualified name to node index
    pub symbol_to_node: HashMap<NodeKey, NodeIndex>,

    /// Packages by name
    pub packages: BTreeMap<NodeKey, PackageNode>,
}

impl RelationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a node; an already registered name keeps its existing node.
    pub fn add_node(&mut self, node: TypeNode) -> NodeIndex {
        if let Some(&idx) = self.symbol_to_node.get(&node.qualified_name) {
            return idx;
        }
        let key = node.qualified_name.clone();
        let idx = self.graph.add_node(node);
        self.symbol_to_node.insert(key, idx);
        idx
    }

    /// Adds an edge unless an identical one already exists. Returns whether it was added.
    pub fn add_edge(&mut self, source: NodeIndex, target: NodeIndex, relation: Relation) -> bool {
        let duplicate = self
            .graph
            .edges_connecting(source, target)
            .any(|e| *e.weight() == relation);
        if duplicate {
            return false;
        }
        self.graph.add_edge(source, target, relation);
        true
    }

    pub fn add_package(&mut self, package: PackageNode) {
        self.packages.entry(package.name.clone()).or_insert(package);
    }

    pub fn get_node_by_symbol(&self, name: &str) -> Option<NodeIndex> {
        self.symbol_to_node.get(name).copied()
    }

    pub fn node(&self, idx: NodeIndex) -> &TypeNode {
        &self.graph[idx]
    }

    pub fn type_node(&self, name: &str) -> Option<&TypeNode> {
        self.get_node_by_symbol(name).map(|idx| self.node(idx))
    }

    pub fn package(&self, name: &str) -> Option<&PackageNode> {
        self.packages.get(name)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Edges whose source is `name`, in edge order.
    pub fn forward_edges(&self, name: &str) -> BTreeSet<Edge> {
        self.edges_directed(name, Direction::Outgoing)
    }

    /// Edges whose target is `name`, in edge order.
    pub fn reverse_edges(&self, name: &str) -> BTreeSet<Edge> {
        self.edges_directed(name, Direction::Incoming)
    }

    fn edges_directed(&self, name: &str, direction: Direction) -> BTreeSet<Edge> {
        let Some(idx) = self.get_node_by_symbol(name) else {
            return BTreeSet::new();
        };
        self.graph
            .edges_directed(idx, direction)
            .map(|e| {
                let source = &self.graph[e.source()].qualified_name;
                let target = &self.graph[e.target()].qualified_name;
                Edge::from_relation(source, target, e.weight())
            })
            .collect()
    }

    /// All types, sorted by qualified name.
    pub fn types(&self) -> Vec<&TypeNode> {
        let mut types: Vec<&TypeNode> = self.graph.node_weights().collect();
        types.sort_by(|a, b| a.qualified_name.cmp(&b.qualified_name));
        types
    }

    /// Included types, sorted by qualified name.
    pub fn included_types(&self) -> Vec<&TypeNode> {
        self.types().into_iter().filter(|t| t.included).collect()
    }

    /// Types declared in `package`, registered or stub, sorted by qualified name.
    pub fn types_in_package(&self, package: &str) -> Vec<&TypeNode> {
        self.types()
            .into_iter()
            .filter(|t| t.in_package(package))
            .collect()
    }
}
