//! Package overview generation: coupling coverage, reduction and skipping.

mod common;

use apiviz::app::dto::{DiagramKind, Severity};
use apiviz::app::engine::{DiagramEngine, OVERVIEW_NAME};
use apiviz::config::GeneratorConfig;
use apiviz::domain::builder::GraphBuilder;
use apiviz::domain::overview::{CoverageGap, PackageOverview, check_coverage};
use apiviz::domain::ports::CouplingAnalyzer;
use pretty_assertions::assert_eq;

use common::fixtures::{layered, zoo};
use common::mock::{MemorySink, MockCouplingAnalyzer};

#[test]
fn test_derived_couplings_are_reduced() {
    let set = layered();
    let mut engine = DiagramEngine::from_descriptors(&set, GeneratorConfig::default()).unwrap();
    let dot = engine.render_overview(None).unwrap();

    assert!(dot.contains("app_web [label=\"web\""));
    assert!(dot.contains("app_core [label=\"core\""));
    assert!(dot.contains("app_util [label=\"util\""));
    assert!(dot.contains("app_web -> app_core ["));
    assert!(dot.contains("app_core -> app_util ["));
    assert!(!dot.contains("app_web -> app_util"));
    assert!(dot.contains("href=\"app/web/package-summary.html\""));
}

#[test]
fn test_packages_are_emitted_greatest_name_first() {
    let set = layered();
    let graph = GraphBuilder::new(&set).build().unwrap();
    let analyzer = MockCouplingAnalyzer::new()
        .with_package("app.core", &["app.core.Service"], &["app.util"])
        .with_package("app.util", &["app.util.Strings"], &[])
        .with_package("app.web", &["app.web.Controller"], &["app.core", "app.util"]);

    let overview = PackageOverview::collect(&graph, &analyzer).unwrap();
    assert_eq!(overview.packages, vec!["app.web", "app.util", "app.core"]);
    assert_eq!(overview.edges.len(), 2);
    assert_eq!(overview.prefix_len, "app.".len());
}

#[test]
fn test_zero_classes_skip_only_the_overview() {
    let set = zoo();
    let analyzer = MockCouplingAnalyzer::new();
    assert_eq!(analyzer.class_count(), 0);

    let mut engine = DiagramEngine::from_descriptors(&set, GeneratorConfig::default()).unwrap();
    let mut sink = MemorySink::default();
    let report = engine.generate(Some(&analyzer), &mut sink).unwrap();

    assert!(!sink.diagrams.contains_key(OVERVIEW_NAME));
    let overview_diagnostics: Vec<_> = report
        .diagnostics
        .iter()
        .filter(|d| d.subject == "overview")
        .collect();
    assert_eq!(overview_diagnostics.len(), 1);
    assert_eq!(overview_diagnostics[0].severity, Severity::Warning);
    assert!(overview_diagnostics[0].message.contains("no classes"));

    assert!(sink.diagrams.contains_key("zoo/package-summary"));
    assert!(sink.diagrams.contains_key("zoo/Cat"));
    assert!(
        report
            .diagrams
            .iter()
            .all(|d| d.kind != DiagramKind::Overview)
    );
}

#[test]
fn test_missing_class_skips_the_overview() {
    let set = layered();
    let graph = GraphBuilder::new(&set).build().unwrap();
    let analyzer = MockCouplingAnalyzer::new()
        .with_package("app.core", &["app.core.Service"], &[])
        .with_package("app.util", &["app.util.Strings"], &[])
        .with_package("app.web", &[], &[]);

    assert_eq!(
        check_coverage(&graph, &analyzer),
        Err(CoverageGap::MissingClass("app.web.Controller".into()))
    );
}

#[test]
fn test_hidden_packages_stay_out_of_the_overview() {
    let set = zoo();
    let analyzer = MockCouplingAnalyzer::new()
        .with_package(
            "zoo",
            &["zoo.Animal", "zoo.Cat", "zoo.Keeper", "zoo.Pet"],
            &["zoo.internal"],
        )
        .with_package("zoo.internal", &["zoo.internal.Ledger"], &[]);

    let mut engine = DiagramEngine::from_descriptors(&set, GeneratorConfig::default()).unwrap();
    let dot = engine.render_overview(Some(&analyzer)).unwrap();
    assert!(dot.contains("zoo [label=\"zoo\""));
    assert!(!dot.contains("zoo_internal"));
}
