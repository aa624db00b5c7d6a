//! Package-dependency overview: the packages to draw, their reduced dependency edges and
//! the label prefix to strip.

use std::collections::BTreeSet;

use tracing::debug;

use crate::domain::edge::{Edge, EdgeKind};
use crate::domain::error::DiagramError;
use crate::domain::graph::RelationGraph;
use crate::domain::ports::CouplingAnalyzer;
use crate::domain::reduction::{common_prefix_len, transitive_reduction};

/// Why the overview cannot be drawn from the analyzer's answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverageGap {
    /// The analyzer saw no classes at all.
    NoClasses,
    /// An included class of a visible package is missing from the analyzer.
    MissingClass(String),
}

impl std::fmt::Display for CoverageGap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoverageGap::NoClasses => write!(f, "coupling analysis found no classes"),
            CoverageGap::MissingClass(name) => {
                write!(f, "coupling analysis is missing class {}", name)
            }
        }
    }
}

/// Name the coupling analyzer knows a type by: package, then the simple name with nesting
/// written as `$`.
pub fn analyzer_class_name(package: &str, simple_name: &str) -> String {
    format!("{}.{}", package, simple_name.replace('.', "$"))
}

/// Checks that the analyzer covers every included class of every visible package.
pub fn check_coverage(
    graph: &RelationGraph,
    analyzer: &dyn CouplingAnalyzer,
) -> Result<(), CoverageGap> {
    if analyzer.class_count() == 0 {
        return Err(CoverageGap::NoClasses);
    }

    for node in graph.included_types() {
        let Some(package) = node.package.as_deref() else {
            continue;
        };
        if graph.package(package).is_some_and(|p| p.is_hidden()) {
            continue;
        }
        let expected = analyzer_class_name(package, &node.name);
        let found = analyzer
            .classes(package)
            .is_some_and(|classes| classes.contains(&expected));
        if !found {
            return Err(CoverageGap::MissingClass(expected));
        }
    }
    Ok(())
}

/// The reduced package dependency graph of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageOverview {
    /// Packages to draw, in the order they are emitted (greatest name first).
    pub packages: Vec<String>,
    pub edges: BTreeSet<Edge>,
    /// Length of the shared dot-terminated prefix stripped from labels.
    pub prefix_len: usize,
}

impl PackageOverview {
    /// Collects visible packages and their couplings, then reduces the edges.
    pub fn collect(
        graph: &RelationGraph,
        analyzer: &dyn CouplingAnalyzer,
    ) -> Result<Self, DiagramError> {
        let documented: BTreeSet<&str> = graph
            .included_types()
            .into_iter()
            .filter_map(|t| t.package.as_deref())
            .collect();

        let visible = |name: &str| {
            documented.contains(name) && graph.package(name).is_none_or(|p| !p.is_hidden())
        };
        let drawable = |name: &str| {
            visible(name) && graph.package(name).is_none_or(|p| p.included)
        };

        let mut packages = Vec::new();
        let mut couplings = Vec::new();
        for &name in documented.iter().rev() {
            if !visible(name) {
                continue;
            }
            let Some(efferents) = analyzer.efferents(name) else {
                debug!(package = name, "Package unknown to coupling analysis");
                continue;
            };
            packages.push(name.to_string());
            couplings.push((name, efferents));
        }

        let known: BTreeSet<&str> = packages.iter().map(String::as_str).collect();
        let mut edges = BTreeSet::new();
        for (source, efferents) in couplings {
            if !drawable(source) {
                continue;
            }
            for target in efferents {
                if target != source && known.contains(target.as_str()) && drawable(&target) {
                    edges.insert(Edge::new(EdgeKind::PackageDependency, source, target));
                }
            }
        }

        let removed = transitive_reduction(&mut edges);
        debug!(
            packages = packages.len(),
            edges = edges.len(),
            removed,
            "Reduced package dependencies"
        );

        let prefix_len = common_prefix_len(packages.iter().map(String::as_str))?;
        Ok(Self {
            packages,
            edges,
            prefix_len,
        })
    }

    /// Label of a package with the shared prefix stripped.
    pub fn label<'n>(&self, package: &'n str) -> &'n str {
        package.get(self.prefix_len..).unwrap_or(package)
    }
}
