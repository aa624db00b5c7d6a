use crate::adapters::coupling::json::JsonCouplingAnalyzer;
use crate::adapters::descriptor::json::JsonDescriptorSource;
use crate::adapters::fs::writer::FsDiagramSink;
use crate::app::dto::Diagnostic;
use crate::app::engine::DiagramEngine;
use crate::config::GeneratorConfig;
use crate::domain::ports::CouplingAnalyzer;
use crate::render::validate::validate_dot;
use anyhow::{Context as _, Result, bail};
use std::path::Path;
use tracing::{info, warn};

/// Loads the config file (if any) and applies the command line flags on top.
pub fn load_config(
    path: Option<&Path>,
    categories: &[String],
    no_package_diagram: bool,
    validate: bool,
) -> Result<GeneratorConfig> {
    let mut config = match path {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::default(),
    };
    config.merge_flags(categories, no_package_diagram, validate);
    Ok(config)
}

pub fn load_engine(descriptors: &Path, config: GeneratorConfig) -> Result<DiagramEngine> {
    let source = JsonDescriptorSource::new(descriptors);
    DiagramEngine::load(&source, config)
}

/// Loads external coupling data. An unreadable file is reported and the engine falls back
/// to couplings derived from the descriptors.
fn load_couplings(engine: &mut DiagramEngine, path: Option<&Path>) -> Option<JsonCouplingAnalyzer> {
    let path = path?;
    match JsonCouplingAnalyzer::load(path) {
        Ok(analyzer) => Some(analyzer),
        Err(err) => {
            engine.push_diagnostic(Diagnostic::warning(
                "couplings",
                format!("{:#}; using couplings derived from the descriptors", err),
            ));
            None
        }
    }
}

/// Generates every diagram into `output` and prints either a summary or the JSON report.
pub fn generate_diagrams(
    descriptors: &Path,
    output: &Path,
    couplings: Option<&Path>,
    config: GeneratorConfig,
    report_json: bool,
) -> Result<()> {
    let mut engine = load_engine(descriptors, config)?;
    let analyzer = load_couplings(&mut engine, couplings);
    let mut sink = FsDiagramSink::new(output);

    let report = engine.generate(
        analyzer.as_ref().map(|a| a as &dyn CouplingAnalyzer),
        &mut sink,
    )?;
    info!(output = %output.display(), files = sink.written().len(), "Diagrams written");

    if report_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Generated {} diagram(s) into {}", report.diagrams.len(), output.display());
    println!("  Nodes: {}", report.node_count);
    println!("  Edges: {}", report.edge_count);
    if !report.diagnostics.is_empty() {
        println!("\nDiagnostics:");
        for diagnostic in &report.diagnostics {
            println!("  {}", diagnostic);
        }
    }
    Ok(())
}

pub fn print_class_diagram(descriptors: &Path, class: &str, config: GeneratorConfig) -> Result<()> {
    let mut engine = load_engine(descriptors, config)?;
    let dot = engine
        .render_class(class)
        .with_context(|| format!("Failed to render class diagram for {}", class))?;
    emit_dot(&engine, &dot)
}

pub fn print_package_diagram(
    descriptors: &Path,
    package: &str,
    config: GeneratorConfig,
) -> Result<()> {
    let mut engine = load_engine(descriptors, config)?;
    let dot = engine
        .render_package(package)
        .with_context(|| format!("Failed to render package diagram for {}", package))?;
    emit_dot(&engine, &dot)
}

pub fn print_overview(
    descriptors: &Path,
    couplings: Option<&Path>,
    config: GeneratorConfig,
) -> Result<()> {
    let mut engine = load_engine(descriptors, config)?;
    let analyzer = load_couplings(&mut engine, couplings);
    let dot = engine
        .render_overview(analyzer.as_ref().map(|a| a as &dyn CouplingAnalyzer))
        .context("Failed to render package overview")?;
    emit_dot(&engine, &dot)
}

fn emit_dot(engine: &DiagramEngine, dot: &str) -> Result<()> {
    print!("{}", dot);
    if engine.config().validate {
        let issues = validate_dot(dot);
        for issue in &issues {
            warn!(%issue, "Generated diagram failed validation");
        }
        if !issues.is_empty() {
            bail!("generated diagram has {} validation issue(s)", issues.len());
        }
    }
    Ok(())
}

/// Builds the relationship graph and prints it as JSON.
pub fn debug_graph_data(descriptors: &Path) -> Result<()> {
    let engine = load_engine(descriptors, GeneratorConfig::default())?;
    let graph = engine.graph();

    let mut nodes = Vec::new();
    for node in graph.types() {
        let edges_out: Vec<serde_json::Value> = graph
            .forward_edges(&node.qualified_name)
            .into_iter()
            .map(|edge| {
                serde_json::json!({
                    "target": edge.target,
                    "kind": format!("{:?}", edge.kind),
                    "labels": edge.labels,
                    "oneway": edge.oneway,
                })
            })
            .collect();

        let mut node_json = serde_json::json!({
            "qualified_name": node.qualified_name,
            "name": node.name,
            "kind": node.kind,
            "included": node.included,
            "stub": node.stub,
            "edges": edges_out,
        });
        if let Some(package) = &node.package {
            node_json["package"] = serde_json::json!(package);
        }
        if let Some(stereotype) = node.stereotype() {
            node_json["stereotype"] = serde_json::json!(stereotype);
        }
        if let Some(category) = &node.tags.category {
            node_json["category"] = serde_json::json!(category);
        }
        nodes.push(node_json);
    }

    let packages: Vec<serde_json::Value> = graph
        .packages
        .values()
        .map(|p| {
            serde_json::json!({
                "name": p.name,
                "included": p.included,
                "hidden": p.is_hidden(),
            })
        })
        .collect();

    let output = serde_json::json!({
        "node_count": graph.node_count(),
        "edge_count": graph.edge_count(),
        "packages": packages,
        "nodes": nodes,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
