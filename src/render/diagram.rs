use crate::domain::edge::Edge;
use crate::domain::error::DiagramError;
use crate::domain::graph::RelationGraph;
use crate::domain::node::{PackageNode, TypeNode};
use crate::domain::overview::PackageOverview;
use crate::domain::selector::{Subgraph, SubgraphSelector};
use crate::domain::style::{CategoryRegistry, DEFAULT_LINE, FONT_IN_SCOPE, StyleResolver};
use crate::render::dot::{DotWriter, ITALIC_FONT, NORMAL_FONT, escape, node_id};
use std::cmp::Ordering;
use tracing::debug;

/// Graph name shared by every diagram.
pub const GRAPH_NAME: &str = "APIVIZ";

/// Class diagrams with at most this many neighbors on either side are laid out top-down.
const LANDSCAPE_LIMIT: usize = 5;

/// Node ordering and layout direction of a diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Left-to-right layout; higher ranks first, names ascending.
    Portrait,
    /// Top-down layout; lower ranks first, names descending.
    Landscape,
}

impl Orientation {
    /// Counts the focal type's neighbors above and below it.
    pub fn for_class<'e>(focus: &str, edges: impl IntoIterator<Item = &'e Edge>) -> Self {
        let (mut above, mut below) = (0usize, 0usize);
        for edge in edges {
            let from_focus = edge.source == focus;
            if edge.kind.is_upward() == from_focus {
                above += 1;
            } else {
                below += 1;
            }
        }
        if above.max(below) <= LANDSCAPE_LIMIT {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }

    pub fn compare(self, left: &TypeNode, right: &TypeNode) -> Ordering {
        let by_rank = left.natural_rank().cmp(&right.natural_rank());
        let by_name = left.name.cmp(&right.name);
        let ordering = match self {
            Orientation::Portrait => by_rank.reverse().then(by_name),
            Orientation::Landscape => by_rank.then(by_name.reverse()),
        };
        ordering.then_with(|| left.qualified_name.cmp(&right.qualified_name))
    }
}

/// Diagram renderer - serializes selected subgraphs and the overview into DOT text.
///
/// Output depends only on the graph, the scope and the category registry, so identical
/// input always yields byte-identical text.
pub struct DiagramRenderer<'a> {
    graph: &'a RelationGraph,
}

impl<'a> DiagramRenderer<'a> {
    pub fn new(graph: &'a RelationGraph) -> Self {
        Self { graph }
    }

    /// Class diagram of `qualified_name`: its direct neighborhood, focal node highlighted.
    pub fn class_diagram(
        &self,
        qualified_name: &str,
        registry: &mut CategoryRegistry,
    ) -> Result<String, DiagramError> {
        let focus = self
            .graph
            .type_node(qualified_name)
            .ok_or_else(|| DiagramError::UnknownType(qualified_name.to_string()))?;
        let subgraph = SubgraphSelector::new(self.graph).select_class(focus);
        let orientation = Orientation::for_class(qualified_name, &subgraph.edges);
        debug!(
            class = qualified_name,
            nodes = subgraph.nodes.len(),
            edges = subgraph.edges.len(),
            ?orientation,
            "Rendering class diagram"
        );

        let mut dot = DotWriter::new(GRAPH_NAME);
        match orientation {
            Orientation::Landscape => dot.attr("rankdir", "TB").attr("ranksep", "0.4").attr("nodesep", "0.3"),
            Orientation::Portrait => dot.attr("rankdir", "LR").attr("ranksep", "1.0").attr("nodesep", "0.2"),
        };
        dot.attr("mclimit", "128");
        write_common_header(&mut dot);

        let scope = focus.package.as_deref();
        self.write_subgraph(&mut dot, &subgraph, scope, Some(qualified_name), orientation, registry);
        Ok(dot.build())
    }

    /// Package summary: every type of the package and its neighbors, hidden ones removed.
    pub fn package_diagram(
        &self,
        package: &str,
        registry: &mut CategoryRegistry,
    ) -> Result<String, DiagramError> {
        if self.graph.package(package).is_none() {
            return Err(DiagramError::UnknownPackage(package.to_string()));
        }
        let subgraph = SubgraphSelector::new(self.graph).select_package(package);
        debug!(
            package,
            nodes = subgraph.nodes.len(),
            edges = subgraph.edges.len(),
            "Rendering package diagram"
        );

        let mut dot = DotWriter::new(GRAPH_NAME);
        dot.attr("rankdir", "LR")
            .attr("ranksep", "0.3")
            .attr("nodesep", "0.25")
            .attr("mclimit", "1024");
        write_common_header(&mut dot);

        self.write_subgraph(&mut dot, &subgraph, Some(package), None, Orientation::Portrait, registry);
        Ok(dot.build())
    }

    /// Package dependency overview.
    pub fn overview_diagram(&self, overview: &PackageOverview, registry: &mut CategoryRegistry) -> String {
        let mut dot = DotWriter::new(GRAPH_NAME);
        dot.attr("rankdir", "LR")
            .attr("ranksep", "0.3")
            .attr("nodesep", "0.2")
            .attr("mclimit", "128");
        write_common_header(&mut dot);

        let packages: Vec<PackageNode> = overview
            .packages
            .iter()
            .map(|name| {
                self.graph
                    .package(name)
                    .cloned()
                    .unwrap_or_else(|| PackageNode::implied(name))
            })
            .collect();
        for package in &packages {
            if let Some(category) = &package.tags.category {
                registry.ensure(category);
            }
        }

        let style = StyleResolver::new(None, None, registry);
        for package in &packages {
            let href = format!("{}/package-summary.html", package.name.replace('.', "/"));
            let fill = style.package_fill_color(package);
            dot.node(
                &node_id(&package.name),
                &[
                    ("label", overview.label(&package.name)),
                    ("style", node_style(package.tags.deprecated)),
                    ("fillcolor", fill.as_str()),
                    ("href", href.as_str()),
                ],
            );
        }

        for edge in &overview.edges {
            write_edge(&mut dot, edge, DEFAULT_LINE, FONT_IN_SCOPE);
        }
        dot.build()
    }

    fn write_subgraph(
        &self,
        dot: &mut DotWriter,
        subgraph: &Subgraph,
        scope: Option<&str>,
        focus: Option<&str>,
        orientation: Orientation,
        registry: &mut CategoryRegistry,
    ) {
        let mut nodes: Vec<&TypeNode> = subgraph
            .nodes
            .iter()
            .filter_map(|name| self.graph.type_node(name))
            .collect();
        nodes.sort_by(|a, b| orientation.compare(a, b));

        for node in &nodes {
            if let Some(category) = &node.tags.category {
                registry.ensure(category);
            }
        }

        let style = StyleResolver::new(scope, focus, registry);
        for node in &nodes {
            let label = node_label(node, scope);
            let tooltip = escape(&label);
            let line = style.line_color(node);
            let fill = style.fill_color(node);
            let href = node_href(node, scope);

            let mut attrs: Vec<(&str, &str)> = vec![("label", label.as_str()), ("tooltip", tooltip.as_str())];
            if node.is_abstract && !node.is_interface() {
                attrs.push(("fontname", ITALIC_FONT));
            }
            attrs.push(("style", node_style(node.tags.deprecated)));
            attrs.push(("color", line.as_str()));
            attrs.push(("fontcolor", style.font_color(node)));
            attrs.push(("fillcolor", fill.as_str()));
            if let Some(href) = &href {
                attrs.push(("href", href.as_str()));
            }
            dot.node(&node_id(&node.qualified_name), &attrs);
        }

        for edge in &subgraph.edges {
            let colors = self
                .graph
                .type_node(&edge.source)
                .zip(self.graph.type_node(&edge.target))
                .map(|(source, target)| style.edge_colors(source, target));
            let (line, font) = colors.unwrap_or_else(|| (DEFAULT_LINE.to_string(), FONT_IN_SCOPE));
            write_edge(dot, edge, &line, font);
        }
    }
}

fn write_common_header(dot: &mut DotWriter) {
    let font = format!("\"{}\"", NORMAL_FONT);
    dot.attr("outputorder", "edgesfirst")
        .attr("center", "1")
        .attr("remincross", "true")
        .attr("searchsize", "65536")
        .attr("splines", "polyline")
        .defaults(
            "edge",
            &[
                ("fontsize", "10"),
                ("fontname", font.as_str()),
                ("style", "\"setlinewidth(0.6)\""),
            ],
        )
        .defaults(
            "node",
            &[
                ("shape", "box"),
                ("fontsize", "10"),
                ("fontname", font.as_str()),
                ("width", "0.1"),
                ("height", "0.1"),
                ("style", "\"setlinewidth(0.6)\""),
            ],
        );
}

fn node_style(deprecated: bool) -> &'static str {
    if deprecated { "filled,dotted" } else { "filled" }
}

/// `«stereotype»\nName`, with `\n(package)` appended for types outside the scope package.
pub fn node_label(node: &TypeNode, scope: Option<&str>) -> String {
    let mut label = String::new();
    if let Some(stereotype) = node.stereotype() {
        label.push_str("&#171;");
        label.push_str(&escape(stereotype));
        label.push_str("&#187;\\n");
    }
    label.push_str(&node.name);
    if let Some(package) = node.package.as_deref() {
        if Some(package) != scope {
            label.push_str("\\n(");
            label.push_str(package);
            label.push(')');
        }
    }
    label
}

/// Relative link from the scope package's directory to the type's page; `None` for types
/// not documented in this run.
pub fn node_href(node: &TypeNode, scope: Option<&str>) -> Option<String> {
    if !node.included {
        return None;
    }
    let source: Vec<&str> = scope.map(|s| s.split('.').collect()).unwrap_or_default();
    let page = format!("{}.html", node.name);
    let mut target: Vec<&str> = node
        .package
        .as_deref()
        .map(|p| p.split('.').collect())
        .unwrap_or_default();
    target.push(&page);

    let common = source
        .iter()
        .zip(&target)
        .take_while(|(a, b)| a == b)
        .count();
    let mut parts: Vec<&str> = vec![".."; source.len() - common];
    parts.extend(&target[common..]);
    Some(parts.join("/"))
}

fn write_edge(dot: &mut DotWriter, edge: &Edge, line: &str, font: &str) {
    let head = edge.arrow_head();
    let tail = edge.kind.arrow_tail();
    let label = escape(&edge.labels.edge);
    let head_label = escape(&edge.labels.target);
    let tail_label = escape(&edge.labels.source);

    // hierarchy edges are drawn parent-first so the parent lands on top
    let (from, to, arrowhead, arrowtail) = if edge.kind.is_upward() {
        (&edge.target, &edge.source, tail, head)
    } else {
        (&edge.source, &edge.target, head, tail)
    };

    dot.edge(
        &node_id(from),
        &node_id(to),
        &[
            ("arrowhead", arrowhead),
            ("arrowtail", arrowtail),
            ("style", edge.kind.line_style()),
            ("dir", "both"),
            ("color", line),
            ("fontcolor", font),
            ("label", label.as_str()),
            ("headlabel", head_label.as_str()),
            ("taillabel", tail_label.as_str()),
        ],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::descriptor::TypeKind;
    use crate::domain::edge::EdgeKind;
    use pretty_assertions::assert_eq;

    fn included(name: &str, kind: TypeKind) -> TypeNode {
        let mut node = TypeNode::stub(name, kind);
        node.included = true;
        node
    }

    #[test]
    fn orientation_switches_after_five_neighbors() {
        let few: Vec<Edge> = (0..5)
            .map(|i| Edge::new(EdgeKind::Generalization, format!("a.Sub{i}"), "a.Base"))
            .collect();
        assert_eq!(Orientation::for_class("a.Base", &few), Orientation::Landscape);

        let many: Vec<Edge> = (0..6)
            .map(|i| Edge::new(EdgeKind::Generalization, format!("a.Sub{i}"), "a.Base"))
            .collect();
        assert_eq!(Orientation::for_class("a.Base", &many), Orientation::Portrait);

        // outgoing dependencies count below, like subtypes
        let mixed: Vec<Edge> = (0..3)
            .map(|i| Edge::new(EdgeKind::Dependency, "a.Base", format!("a.Dep{i}")))
            .chain((0..3).map(|i| Edge::new(EdgeKind::Realization, format!("a.Impl{i}"), "a.Base")))
            .collect();
        assert_eq!(Orientation::for_class("a.Base", &mixed), Orientation::Portrait);
    }

    #[test]
    fn node_order_depends_on_orientation() {
        let iface = included("a.Zeta", TypeKind::Interface);
        let class = included("a.Alpha", TypeKind::Class);
        let other = included("a.Beta", TypeKind::Class);

        let mut nodes = vec![&class, &iface, &other];
        nodes.sort_by(|a, b| Orientation::Portrait.compare(a, b));
        let names: Vec<_> = nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Beta", "Zeta"]);

        nodes.sort_by(|a, b| Orientation::Landscape.compare(a, b));
        let names: Vec<_> = nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["Zeta", "Beta", "Alpha"]);
    }

    #[test]
    fn labels_show_stereotype_and_foreign_package() {
        let iface = included("x.y.Pet", TypeKind::Interface);
        assert_eq!(node_label(&iface, Some("x.y")), "&#171;interface&#187;\\nPet");
        assert_eq!(
            node_label(&iface, Some("zoo")),
            "&#171;interface&#187;\\nPet\\n(x.y)"
        );
        let bare = included("Loose", TypeKind::Class);
        assert_eq!(node_label(&bare, Some("zoo")), "Loose");
    }

    #[test]
    fn href_is_relative_to_scope_package() {
        let node = included("a.b.Foo", TypeKind::Class);
        assert_eq!(node_href(&node, Some("a.b")).as_deref(), Some("Foo.html"));
        assert_eq!(node_href(&node, Some("a.c")).as_deref(), Some("../b/Foo.html"));
        assert_eq!(node_href(&node, Some("z")).as_deref(), Some("../a/b/Foo.html"));
        assert_eq!(node_href(&node, None).as_deref(), Some("a/b/Foo.html"));

        let stub = TypeNode::stub("ext.Lib", TypeKind::Class);
        assert_eq!(node_href(&stub, Some("a.b")), None);
    }

    #[test]
    fn upward_edges_are_reversed_with_swapped_arrows() {
        let mut dot = DotWriter::new(GRAPH_NAME);
        write_edge(
            &mut dot,
            &Edge::new(EdgeKind::Generalization, "zoo.Cat", "zoo.Animal"),
            "#000000",
            "black",
        );
        let text = dot.build();
        assert!(text.contains(
            "zoo_Animal -> zoo_Cat [arrowhead=\"none\", arrowtail=\"onormal\", style=\"solid\", dir=\"both\""
        ));
    }
}
