use serde::Serialize;

/// Edge kind - UML relationship classification.
///
/// Declaration order is the edge priority used to order edge sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum EdgeKind {
    // ============ Type Hierarchy (drawn upward) ============
    Generalization, // Subtype → Supertype
    Realization,    // Implementor → Interface

    // ============ Custom relationship tags ============
    Dependency,   // uses
    Navigability, // has
    Aggregation,  // owns
    Composition,  // composedOf

    // ============ Cross references ============
    SeeAlso, // smaller name → larger name

    // ============ Overview ============
    PackageDependency,
}

impl EdgeKind {
    /// Arrow head glyph; `None` means "open when oneway, otherwise none".
    pub fn arrow_head(self) -> Option<&'static str> {
        match self {
            EdgeKind::Generalization | EdgeKind::Realization => Some("onormal"),
            EdgeKind::Dependency | EdgeKind::PackageDependency => Some("open"),
            EdgeKind::SeeAlso => Some("none"),
            EdgeKind::Navigability | EdgeKind::Aggregation | EdgeKind::Composition => None,
        }
    }

    pub fn arrow_tail(self) -> &'static str {
        match self {
            EdgeKind::Aggregation => "odiamond",
            EdgeKind::Composition => "diamond",
            _ => "none",
        }
    }

    pub fn line_style(self) -> &'static str {
        match self {
            EdgeKind::Realization | EdgeKind::Dependency | EdgeKind::PackageDependency => "dashed",
            EdgeKind::SeeAlso => "dotted",
            _ => "solid",
        }
    }

    /// Hierarchy edges point from child to parent in the model but are laid out with the
    /// parent on top, so the renderer emits them reversed.
    pub fn is_upward(self) -> bool {
        matches!(self, EdgeKind::Generalization | EdgeKind::Realization)
    }
}

/// Optional labels drawn at the tail, head and middle of an edge.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct EdgeLabels {
    pub source: String,
    pub target: String,
    pub edge: String,
}

impl EdgeLabels {
    pub fn edge_only(edge: impl Into<String>) -> Self {
        Self {
            edge: edge.into(),
            ..Self::default()
        }
    }
}

/// Relationship payload stored on graph edges.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Relation {
    pub kind: EdgeKind,
    pub labels: EdgeLabels,
    pub oneway: bool,
}

impl Relation {
    pub fn new(kind: EdgeKind) -> Self {
        Self {
            kind,
            labels: EdgeLabels::default(),
            oneway: false,
        }
    }
}

/// A resolved edge with both endpoints named.
///
/// The derived ordering (kind, source, target, labels, oneway) is the total order of every
/// edge set in a diagram.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Edge {
    pub kind: EdgeKind,
    pub source: String,
    pub target: String,
    pub labels: EdgeLabels,
    pub oneway: bool,
}

impl Edge {
    pub fn new(kind: EdgeKind, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            kind,
            source: source.into(),
            target: target.into(),
            labels: EdgeLabels::default(),
            oneway: false,
        }
    }

    pub fn from_relation(source: &str, target: &str, relation: &Relation) -> Self {
        Self {
            kind: relation.kind,
            source: source.to_string(),
            target: target.to_string(),
            labels: relation.labels.clone(),
            oneway: relation.oneway,
        }
    }

    /// Arrow head glyph after resolving the oneway flag.
    pub fn arrow_head(&self) -> &'static str {
        match self.kind.arrow_head() {
            Some(head) => head,
            None if self.oneway => "open",
            None => "none",
        }
    }
}
