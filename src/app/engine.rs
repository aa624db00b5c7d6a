use crate::adapters::coupling::derived::DescriptorCouplingAnalyzer;
use crate::app::dto::*;
use crate::config::GeneratorConfig;
use crate::domain::builder::GraphBuilder;
use crate::domain::descriptor::DescriptorSet;
use crate::domain::error::DiagramError;
use crate::domain::graph::RelationGraph;
use crate::domain::node::TypeNode;
use crate::domain::overview::{PackageOverview, check_coverage};
use crate::domain::ports::{CouplingAnalyzer, DescriptorSource, DiagramSink};
use crate::domain::style::{Category, CategoryRegistry};
use crate::render::diagram::DiagramRenderer;
use crate::render::validate::validate_dot;
use anyhow::{Context as _, Result, anyhow};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Output name of the package dependency overview.
pub const OVERVIEW_NAME: &str = "overview-summary";

/// Output name of a package summary diagram: `a/b/package-summary`.
pub fn package_diagram_name(package: &str) -> String {
    format!("{}/package-summary", package.replace('.', "/"))
}

/// Output name of a class diagram: `a/b/Name`, or `Name` for types without a package.
pub fn class_diagram_name(node: &TypeNode) -> String {
    match node.package.as_deref() {
        Some(package) if !package.is_empty() => {
            format!("{}/{}", package.replace('.', "/"), node.name)
        }
        _ => node.name.clone(),
    }
}

/// Drives one generation run: owns the relation graph and the category registry, and
/// renders overview, package and class diagrams in that order.
pub struct DiagramEngine {
    graph: RelationGraph,
    derived: DescriptorCouplingAnalyzer,
    registry: CategoryRegistry,
    config: GeneratorConfig,
    diagnostics: Vec<Diagnostic>,
}

impl DiagramEngine {
    pub fn load(source: &dyn DescriptorSource, config: GeneratorConfig) -> Result<Self> {
        let descriptors = source.load().context("Failed to load descriptors")?;
        Self::from_descriptors(&descriptors, config)
    }

    /// Builds the graph and declares the configured categories.
    ///
    /// Fails when the graph cannot be built (an invalid exclude pattern); a malformed
    /// category only produces a diagnostic.
    pub fn from_descriptors(descriptors: &DescriptorSet, config: GeneratorConfig) -> Result<Self> {
        let graph = GraphBuilder::new(descriptors)
            .build()
            .context("Failed to build relationship graph")?;
        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            packages = graph.packages.len(),
            "Relationship graph ready"
        );

        let mut engine = Self {
            graph,
            derived: DescriptorCouplingAnalyzer::from_descriptors(descriptors),
            registry: CategoryRegistry::new(),
            config,
            diagnostics: Vec::new(),
        };
        engine.declare_categories();
        Ok(engine)
    }

    fn declare_categories(&mut self) {
        for spec in &self.config.categories {
            match Category::parse(spec) {
                Ok(category) => {
                    let name = category.name.clone();
                    if !self.registry.declare(category) {
                        self.diagnostics.push(Diagnostic::warning(
                            format!("category {}", name),
                            "defined multiple times; the last definition wins",
                        ));
                    }
                }
                Err(err) => {
                    warn!(error = %err, "Ignoring category");
                    self.diagnostics
                        .push(Diagnostic::warning("configuration", err.to_string()));
                }
            }
        }
    }

    pub fn graph(&self) -> &RelationGraph {
        &self.graph
    }

    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Diagnostics raised while setting up the engine.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Records a problem found outside the engine, e.g. an unreadable optional input.
    pub fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        warn!(subject = %diagnostic.subject, message = %diagnostic.message, "Diagnostic");
        self.diagnostics.push(diagnostic);
    }

    pub fn render_class(&mut self, qualified_name: &str) -> Result<String, DiagramError> {
        DiagramRenderer::new(&self.graph).class_diagram(qualified_name, &mut self.registry)
    }

    pub fn render_package(&mut self, package: &str) -> Result<String, DiagramError> {
        DiagramRenderer::new(&self.graph).package_diagram(package, &mut self.registry)
    }

    /// Renders the overview from `analyzer`, or from couplings derived from the
    /// descriptors when none is given.
    pub fn render_overview(&mut self, analyzer: Option<&dyn CouplingAnalyzer>) -> Result<String> {
        let analyzer = analyzer.unwrap_or(&self.derived);
        check_coverage(&self.graph, analyzer).map_err(|gap| anyhow!("{}", gap))?;
        let overview = PackageOverview::collect(&self.graph, analyzer)?;
        Ok(DiagramRenderer::new(&self.graph).overview_diagram(&overview, &mut self.registry))
    }

    /// Packages that get a summary diagram, sorted by name: those holding at least one
    /// included type, whatever their own descriptor says.
    pub fn documented_packages(&self) -> Vec<String> {
        self.graph
            .included_types()
            .into_iter()
            .filter_map(|t| t.package.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Generates every diagram into `sink`.
    ///
    /// A failing diagram is skipped and reported; only sink failures and fatal diagram
    /// errors abort the run.
    pub fn generate(
        &mut self,
        analyzer: Option<&dyn CouplingAnalyzer>,
        sink: &mut dyn DiagramSink,
    ) -> Result<GenerationReport> {
        let mut report = GenerationReport {
            node_count: self.graph.node_count(),
            edge_count: self.graph.edge_count(),
            diagnostics: self.diagnostics.clone(),
            ..Default::default()
        };

        // Overview
        if self.config.package_diagram {
            match self.render_overview(analyzer) {
                Ok(dot) => {
                    self.emit(sink, &mut report, OVERVIEW_NAME, DiagramKind::Overview, "overview", dot)?
                }
                Err(err) => {
                    warn!(error = %err, "Skipping package overview");
                    report.diagnostics.push(Diagnostic::warning(
                        "overview",
                        format!("skipped: {:#}", err),
                    ));
                }
            }
        } else {
            debug!("Package overview disabled");
        }

        // Package summaries
        for package in self.documented_packages() {
            match self.render_package(&package) {
                Ok(dot) => {
                    let name = package_diagram_name(&package);
                    self.emit(sink, &mut report, &name, DiagramKind::Package, &package, dot)?;
                }
                Err(err) => self.skip(&mut report, format!("package {}", package), err)?,
            }
        }

        // Class diagrams
        let classes: Vec<(String, String)> = self
            .graph
            .included_types()
            .into_iter()
            .map(|t| (t.qualified_name.clone(), class_diagram_name(t)))
            .collect();
        for (qualified_name, name) in classes {
            match self.render_class(&qualified_name) {
                Ok(dot) => {
                    self.emit(sink, &mut report, &name, DiagramKind::Class, &qualified_name, dot)?
                }
                Err(err) => self.skip(&mut report, qualified_name, err)?,
            }
        }

        report.categories = self.registry.iter().map(CategorySummary::from).collect();
        info!(
            diagrams = report.diagrams.len(),
            diagnostics = report.diagnostics.len(),
            "Generation finished"
        );
        Ok(report)
    }

    fn emit(
        &self,
        sink: &mut dyn DiagramSink,
        report: &mut GenerationReport,
        name: &str,
        kind: DiagramKind,
        subject: &str,
        dot: String,
    ) -> Result<()> {
        let issues = if self.config.validate {
            validate_dot(&dot)
        } else {
            Vec::new()
        };
        for issue in &issues {
            warn!(diagram = name, %issue, "Generated diagram failed validation");
            report
                .diagnostics
                .push(Diagnostic::warning(name, format!("invalid DOT at {}", issue)));
        }

        sink.write(name, &dot)
            .with_context(|| format!("Failed to store diagram {}", name))?;
        report.diagrams.push(DiagramSummary {
            name: name.to_string(),
            kind,
            subject: subject.to_string(),
            issues,
        });
        Ok(())
    }

    fn skip(&self, report: &mut GenerationReport, subject: String, err: DiagramError) -> Result<()> {
        if err.is_fatal() {
            return Err(err).with_context(|| format!("Failed to render {}", subject));
        }
        warn!(subject = %subject, error = %err, "Skipping diagram");
        report.diagnostics.push(Diagnostic::error(subject, err.to_string()));
        Ok(())
    }
}
