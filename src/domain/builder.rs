use crate::domain::descriptor::{DescriptorSet, TypeDescriptor, TypeKind, derive_package};
use crate::domain::edge::{EdgeKind, EdgeLabels, Relation};
use crate::domain::error::DiagramError;
use crate::domain::graph::RelationGraph;
use crate::domain::node::{PackageNode, TypeNode};
use petgraph::graph::NodeIndex;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Supertypes every class implicitly has; never drawn.
pub const UNIVERSAL_ROOTS: [&str; 3] = ["java.lang.Object", "java.lang.Annotation", "java.lang.Enum"];

/// Interface every annotation type implicitly implements; never drawn.
pub const ANNOTATION_MARKER: &str = "java.lang.annotation.Annotation";

/// Label of cross-reference edges.
pub const SEE_ALSO_LABEL: &str = "&#171;see also&#187;";

/// Graph builder - Domain Service for constructing RelationGraph
pub struct GraphBuilder<'a> {
    descriptors: &'a DescriptorSet,
    by_name: HashMap<&'a str, &'a TypeDescriptor>,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(descriptors: &'a DescriptorSet) -> Self {
        let mut by_name: HashMap<&'a str, &'a TypeDescriptor> = HashMap::new();
        for descriptor in &descriptors.types {
            if by_name.contains_key(descriptor.qualified_name.as_str()) {
                warn!(
                    name = %descriptor.qualified_name,
                    "Duplicate type descriptor; keeping the first"
                );
                continue;
            }
            by_name.insert(descriptor.qualified_name.as_str(), descriptor);
        }
        Self { descriptors, by_name }
    }

    /// Four-pass build strategy. Fails only on an invalid exclude pattern.
    pub fn build(&self) -> Result<RelationGraph, DiagramError> {
        let mut graph = RelationGraph::new();

        // Pass 1: Packages
        for package in &self.descriptors.packages {
            graph.add_package(PackageNode::from_descriptor(package)?);
        }

        // Pass 2: Included types, plus packages they imply
        let mut roots: Vec<&TypeDescriptor> =
            self.by_name.values().copied().filter(|t| t.included).collect();
        roots.sort_by(|a, b| a.qualified_name.cmp(&b.qualified_name));

        for descriptor in &roots {
            graph.add_node(TypeNode::from_descriptor(descriptor)?);
            if let Some(package) = descriptor.package_name() {
                graph.add_package(PackageNode::implied(&package));
            }
        }
        info!(
            types = roots.len(),
            packages = graph.packages.len(),
            "Building relationship graph"
        );

        // Pass 3: Hierarchy and custom relationship tags
        for descriptor in &roots {
            let Some(source) = graph.get_node_by_symbol(&descriptor.qualified_name) else {
                continue;
            };

            if let Some(superclass) = &descriptor.superclass {
                if !UNIVERSAL_ROOTS.contains(&superclass.as_str()) {
                    let target = self.resolve_supertype(&mut graph, superclass, TypeKind::Class)?;
                    graph.add_edge(source, target, Relation::new(EdgeKind::Generalization));
                }
            }

            for interface in &descriptor.interfaces {
                if interface == ANNOTATION_MARKER {
                    continue;
                }
                let target = self.resolve_supertype(&mut graph, interface, TypeKind::Interface)?;
                graph.add_edge(source, target, Relation::new(EdgeKind::Realization));
            }

            let relations = graph.node(source).tags.relations.clone();
            for tag in relations {
                let package = descriptor.package_name();
                let target = self.resolve_tag_target(&mut graph, &tag.target, package.as_deref())?;
                let relation = Relation {
                    kind: tag.kind,
                    labels: tag.labels,
                    oneway: tag.oneway,
                };
                graph.add_edge(source, target, relation);
            }
        }

        // Pass 4: Cross references, one edge per pair, smaller name → larger name
        for descriptor in &roots {
            let from = descriptor.qualified_name.as_str();
            let package = descriptor.package_name();
            for reference in &descriptor.see_also {
                let Some(referenced) = self.lookup(reference, package.as_deref()) else {
                    debug!(from, reference = %reference, "Skipping unresolvable cross reference");
                    continue;
                };
                let to = referenced.qualified_name.as_str();
                if from == to {
                    continue;
                }
                let referenced_idx = self.register_described(&mut graph, referenced)?;
                let Some(from_idx) = graph.get_node_by_symbol(from) else {
                    continue;
                };
                let (source, target) = if from < to {
                    (from_idx, referenced_idx)
                } else {
                    (referenced_idx, from_idx)
                };
                let mut relation = Relation::new(EdgeKind::SeeAlso);
                relation.labels = EdgeLabels::edge_only(SEE_ALSO_LABEL);
                graph.add_edge(source, target, relation);
            }
        }

        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Relationship graph built"
        );
        Ok(graph)
    }

    /// Exact name first, then the name relative to `package`.
    fn lookup(&self, name: &str, package: Option<&str>) -> Option<&'a TypeDescriptor> {
        if let Some(found) = self.by_name.get(name).copied() {
            return Some(found);
        }
        let qualified = format!("{}.{}", package?, name);
        self.by_name.get(qualified.as_str()).copied()
    }

    /// Registers a described type without expanding its relations.
    fn register_described(
        &self,
        graph: &mut RelationGraph,
        descriptor: &TypeDescriptor,
    ) -> Result<NodeIndex, DiagramError> {
        if let Some(idx) = graph.get_node_by_symbol(&descriptor.qualified_name) {
            return Ok(idx);
        }
        Ok(graph.add_node(TypeNode::from_descriptor(descriptor)?))
    }

    fn resolve_supertype(
        &self,
        graph: &mut RelationGraph,
        name: &str,
        kind: TypeKind,
    ) -> Result<NodeIndex, DiagramError> {
        match self.by_name.get(name) {
            Some(descriptor) => self.register_described(graph, descriptor),
            None => Ok(graph.add_node(TypeNode::stub(name, kind))),
        }
    }

    fn resolve_tag_target(
        &self,
        graph: &mut RelationGraph,
        name: &str,
        package: Option<&str>,
    ) -> Result<NodeIndex, DiagramError> {
        if let Some(descriptor) = self.lookup(name, package) {
            return self.register_described(graph, descriptor);
        }
        // simple names are qualified with the source's package
        let key = match package {
            Some(package) if derive_package(name).is_none() => format!("{}.{}", package, name),
            _ => name.to_string(),
        };
        if let Some(idx) = graph.get_node_by_symbol(&key) {
            return Ok(idx);
        }
        debug!(target = %key, "Creating stub node for unknown relation target");
        Ok(graph.add_node(TypeNode::stub(&key, TypeKind::Class)))
    }
}
